//! Benchmarks for the order book core.
//!
//! ## Running
//!
//! ```bash
//! cargo bench
//! cargo bench -- single_match
//! ```
//!
//! Results land in `target/criterion/` with HTML reports.

use std::time::Duration;

use criterion::{
    black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput,
};

use lobcore::{Book, Order, OrderType, Side};

// ============================================================================
// HELPER FUNCTIONS - Deterministic order generation
// ============================================================================

fn make_buy(id: u64, price: u64, quantity: u64) -> Order {
    Order::new(id, OrderType::Gtc, Side::Buy, price, quantity)
}

fn make_sell(id: u64, price: u64, quantity: u64) -> Order {
    Order::new(id, OrderType::Gtc, Side::Sell, price, quantity)
}

/// Rest `count` asks on ascending price levels starting at `base_price`.
/// Ids are `id_base..id_base + count`.
fn populate_asks(book: &mut Book, id_base: u64, count: u64, base_price: u64, quantity: u64) {
    for i in 0..count {
        book.add(make_sell(id_base + i, base_price + i, quantity))
            .expect("bench orders carry a side");
    }
}

/// Rest `count` bids on descending price levels starting at `base_price`.
fn populate_bids(book: &mut Book, id_base: u64, count: u64, base_price: u64, quantity: u64) {
    for i in 0..count {
        book.add(make_buy(id_base + i, base_price - i, quantity))
            .expect("bench orders carry a side");
    }
}

/// Deterministic mixed flow around a mid price.
fn generate_order_batch(count: usize, seed: u64) -> Vec<Order> {
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut orders = Vec::with_capacity(count);
    let base_price: u64 = 10_000;

    for i in 0..count {
        let is_buy = rng.gen_bool(0.5);
        let price = rng.gen_range(base_price - 50..=base_price + 50);
        let quantity = rng.gen_range(1..=100u64);

        let order = if is_buy {
            make_buy((i + 1) as u64, price, quantity)
        } else {
            make_sell((i + 1) as u64, price, quantity)
        };
        orders.push(order);
    }

    orders
}

// ============================================================================
// BENCHMARK: Single Match Latency
// ============================================================================

fn bench_single_match(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_match");
    group.measurement_time(Duration::from_secs(10));

    group.bench_function("against_1k_orders", |b| {
        let mut book = Book::with_capacity(2_000);
        populate_asks(&mut book, 1, 1_000, 10_000, 100);

        b.iter_batched(
            || book.clone(),
            |mut book| black_box(book.add(make_buy(999_999, 10_000, 100))),
            BatchSize::SmallInput,
        );
    });

    group.bench_function("multi_level_sweep", |b| {
        b.iter_batched(
            || {
                let mut book = Book::with_capacity(200);
                populate_asks(&mut book, 1, 100, 10_000, 10);
                book
            },
            // Sweeps ten full levels.
            |mut book| black_box(book.add(make_buy(999_999, 10_009, 100))),
            BatchSize::SmallInput,
        );
    });

    group.bench_function("no_match_rest_on_book", |b| {
        b.iter_batched(
            || {
                let mut book = Book::with_capacity(2_000);
                populate_asks(&mut book, 1, 1_000, 10_000, 100);
                book
            },
            |mut book| black_box(book.add(make_buy(999_999, 9_000, 100))),
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

// ============================================================================
// BENCHMARK: Order Operations
// ============================================================================

fn bench_order_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("order_operations");
    group.measurement_time(Duration::from_secs(5));

    group.bench_function("add_to_empty", |b| {
        b.iter_batched(
            Book::new,
            |mut book| black_box(book.add(make_buy(1, 10_000, 100))),
            BatchSize::SmallInput,
        );
    });

    group.bench_function("add_to_1k_book", |b| {
        let mut book = Book::with_capacity(2_000);
        populate_asks(&mut book, 1, 500, 10_100, 100);
        populate_bids(&mut book, 501, 500, 9_900, 100);

        b.iter_batched(
            || book.clone(),
            |mut book| black_box(book.add(make_buy(999_999, 9_000, 100))),
            BatchSize::SmallInput,
        );
    });

    group.bench_function("cancel_mid_book", |b| {
        let mut book = Book::with_capacity(2_000);
        populate_bids(&mut book, 1, 1_000, 10_000, 100);

        b.iter_batched(
            || book.clone(),
            |mut book| {
                book.cancel(500);
                black_box(book.order_count())
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

// ============================================================================
// BENCHMARK: Throughput
// ============================================================================

fn bench_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("throughput");
    group.measurement_time(Duration::from_secs(15));
    group.sample_size(50);

    for batch_size in [1_000, 10_000, 50_000] {
        group.throughput(Throughput::Elements(batch_size as u64));

        group.bench_with_input(
            BenchmarkId::new("orders", batch_size),
            &batch_size,
            |b, &size| {
                let orders = generate_order_batch(size, 42);

                b.iter_batched(
                    || (Book::with_capacity(size), orders.clone()),
                    |(mut book, orders)| {
                        for order in orders {
                            black_box(
                                book.add(order).expect("bench orders carry a side"),
                            );
                        }
                        book.order_count()
                    },
                    BatchSize::LargeInput,
                );
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_single_match,
    bench_order_operations,
    bench_throughput
);

criterion_main!(benches);
