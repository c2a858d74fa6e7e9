use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use ringmul::dft::rader::DiscreteLog;
use ringmul::ring::Ring;
use ringmul::Parameters;
use std::sync::Arc;

fn ring(log_n0: usize) -> Ring {
    let params: Parameters = Parameters::generate(log_n0, 8, 55, 1).unwrap();
    let dlog: Arc<DiscreteLog> = Arc::new(DiscreteLog::new(params.n1()).unwrap());
    Ring::new(params.primes[0], log_n0, dlog).unwrap()
}

fn ntt(c: &mut Criterion) {
    fn runner<'a, const FORWARD: bool, const LAZY: bool>(ring: &'a Ring) -> Box<dyn FnMut() + 'a> {
        let q: u64 = ring.q();
        let mut a: Vec<u64> = (0..ring.n() as u64).map(|i| i % q).collect();
        if FORWARD {
            Box::new(move || ring.ntt_inplace::<LAZY>(&mut a))
        } else {
            Box::new(move || ring.intt_inplace::<LAZY>(&mut a))
        }
    }

    let mut b: criterion::BenchmarkGroup<'_, criterion::measurement::WallTime> =
        c.benchmark_group("ntt_2d");

    for log_n0 in 2..7 {
        let ring: Ring = ring(log_n0);

        let runners: [(&str, Box<dyn FnMut()>); 4] = [
            ("forward/LAZY=true", runner::<true, true>(&ring)),
            ("forward/LAZY=false", runner::<true, false>(&ring)),
            ("backward/LAZY=true", runner::<false, true>(&ring)),
            ("backward/LAZY=false", runner::<false, false>(&ring)),
        ];

        for (name, mut runner) in runners {
            let id: BenchmarkId = BenchmarkId::new(name, format!("n0={}/n1={}", ring.n0, ring.n1));
            b.bench_with_input(id, &(), |b: &mut criterion::Bencher<'_>, _| b.iter(&mut runner));
        }
    }
}

fn axis(c: &mut Criterion) {
    let mut b: criterion::BenchmarkGroup<'_, criterion::measurement::WallTime> =
        c.benchmark_group("ntt_axis");

    let ring: Ring = ring(6);
    let q: u64 = ring.q();

    let mut row: Vec<u64> = (0..ring.n0 as u64).map(|i| i % q).collect();
    b.bench_function(format!("x0/n0={}", ring.n0), |b| {
        b.iter(|| ring.ntt_x0_inplace(&mut row))
    });

    let mut col: Vec<u64> = (0..ring.n1 as u64).map(|i| i % q).collect();
    b.bench_function(format!("x1/n1={}", ring.n1), |b| {
        b.iter(|| ring.ntt_x1_inplace::<false>(&mut col))
    });
    b.bench_function(format!("x1_lazy/n1={}", ring.n1), |b| {
        b.iter(|| ring.ntt_x1_inplace::<true>(&mut col))
    });
}

criterion_group!(benches, ntt, axis);
criterion_main!(benches);
