//! Demo binary: drives a book through a short session and prints the tape.

use std::str::FromStr;

use rust_decimal::Decimal;

use lobcore::types::price::{ticks_to_decimal, to_ticks};
use lobcore::{Change, Order, OrderBook, OrderType, Side};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let tick_size = Decimal::from_str("0.25").expect("literal tick size");
    let book = OrderBook::new();

    // Seed some resting liquidity. Prices are quoted in decimals and
    // converted to ticks at the edge.
    let quotes = [
        (1, OrderType::Gtc, Side::Buy, "99.75", 10),
        (2, OrderType::Gtc, Side::Buy, "99.50", 25),
        (3, OrderType::Gtc, Side::Sell, "100.25", 15),
        (4, OrderType::Gfd, Side::Sell, "100.50", 30),
    ];
    for (id, order_type, side, price, quantity) in quotes {
        let ticks = to_ticks(price, tick_size).expect("on-tick literal quote");
        book.add(Order::new(id, order_type, side, ticks, quantity))
            .expect("demo orders carry a side");
    }

    println!("book seeded: best bid {:?}, best ask {:?}", book.best_bid(), book.best_ask());

    // An aggressive buy that sweeps the first ask level and part of the next.
    let ticks = to_ticks("100.50", tick_size).expect("on-tick literal quote");
    let trades = book
        .add(Order::new(5, OrderType::Gtc, Side::Buy, ticks, 20))
        .expect("demo orders carry a side");

    for trade in &trades {
        println!(
            "trade: bid #{} / ask #{}  {} @ {}",
            trade.bid.order_id,
            trade.ask.order_id,
            trade.quantity(),
            ticks_to_decimal(trade.ask.price, tick_size),
        );
    }

    // Shrink the remaining bid, losing its queue priority.
    book.modify(
        1,
        Change {
            side: Side::Buy,
            price: to_ticks("99.50", tick_size).expect("on-tick literal quote"),
            remainder: 5,
        },
    )
    .expect("change carries a side");

    println!(
        "after modify: level 99.50 queue = {:?}",
        book.orders_at(Side::Buy, to_ticks("99.50", tick_size).expect("on-tick literal quote")),
    );

    // End the day early: cancel all good-for-day orders now.
    let pruned = book.prune_gfd();
    println!("pruned {pruned} good-for-day order(s); {} resting", book.order_count());
}
