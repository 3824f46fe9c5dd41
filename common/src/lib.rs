pub mod arith;
pub mod dleq;
pub mod error;
pub mod polynomial;
pub mod random;
pub mod utils;

// pub const BENCH_N_T: [(usize, usize); 4] = [(8, 3), (16, 7), (32, 15), (64, 31)];
pub const BENCH_N_T: [(usize, usize); 2] = [
    (8, 3),
    // (32, 15),
    // (64, 31),
    (16, 7),
];

pub const BENCH_MODULUS_BITS: usize = 128;

pub const BENCH_WORKERS: [usize; 3] = [1, 2, 4];
