use criterion::{Criterion, criterion_group, criterion_main};
use num_bigint::BigUint;

use common::{BENCH_MODULUS_BITS, BENCH_N_T, BENCH_WORKERS, random::random_below};
use pvss::{dealer::Dealer, instance::PvssInstance, party::Party};

fn pvss(c: &mut Criterion) {
    for (n, t) in BENCH_N_T {
        let mut rng = rand::rng();

        let instance = PvssInstance::generate(BENCH_MODULUS_BITS, &mut rng).unwrap();
        let parties: Vec<Party> = (0..n)
            .map(|_| Party::new(instance.clone(), &mut rng))
            .collect();
        let public_keys: Vec<BigUint> = parties
            .iter()
            .map(|party| party.public_key.clone())
            .collect();

        let secret = random_below(&mut rng, &instance.q);
        let dealer = Dealer::new(instance.clone());
        let bundle = dealer
            .distribute_secret(&secret, &public_keys, t, &mut rng)
            .unwrap();

        c.bench_function(
            &format!("(n: {}, t: {}) | PVSS | Dealer: Distribute Secret", n, t),
            |b| {
                b.iter(|| {
                    dealer
                        .distribute_secret(&secret, &public_keys, t, &mut rng)
                        .unwrap()
                })
            },
        );

        c.bench_function(
            &format!("(n: {}, t: {}) | PVSS | Verify Distribution", n, t),
            |b| b.iter(|| assert!(instance.verify_distribution(&bundle))),
        );

        c.bench_function(
            &format!("(n: {}, t: {}) | PVSS | Party: Extract Share", n, t),
            |b| b.iter(|| parties[0].extract_share(&bundle, &mut rng).unwrap()),
        );

        let shares: Vec<_> = parties
            .iter()
            .map(|party| party.extract_share(&bundle, &mut rng).unwrap())
            .collect();

        c.bench_function(
            &format!("(n: {}, t: {}) | PVSS | Verify Share", n, t),
            |b| b.iter(|| assert!(instance.verify_share(&shares[0], &bundle, &parties[0].public_key))),
        );

        c.bench_function(
            &format!("(n: {}, t: {}) | PVSS | Reconstruct Secret", n, t),
            |b| {
                b.iter(|| {
                    let reconstruction = instance.reconstruct(&shares, &bundle).unwrap();
                    assert_eq!(reconstruction.secret, secret);
                })
            },
        );

        for workers in BENCH_WORKERS {
            c.bench_function(
                &format!(
                    "(n: {}, t: {}) | PVSS | Reconstruct Secret ({} workers)",
                    n, t, workers
                ),
                |b| {
                    b.iter(|| {
                        instance
                            .reconstruct_parallel(&shares, &bundle, workers)
                            .unwrap()
                    })
                },
            );
        }
    }
}

criterion_group!(benches, pvss,);
criterion_main!(benches);
