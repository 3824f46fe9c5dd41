use error_chain::error_chain;

error_chain! {
    foreign_links {
        ThreadPool(::rayon::ThreadPoolBuildError);
    }
    errors{
        CompositeModulus(t: String) {
            description("The instance modulus is not a prime number")
            display("The instance modulus is not a prime number: '{}'", t)
        }
        CountMismatch(c1: usize, c1_type: &'static str, c2: usize, c2_type: &'static str) {
            description("The number of {c1_type} does not match the number of {c2_type}.")
            display("The number of {c1_type} does not match the number of {c2_type}.\nHave {c1} {c1_type} but {c2} {c2_type}.")
        }
        InsufficientShares(count: usize, t: usize){
            description("The number of collected shares is less than the reconstruction threshold.")
            display("The number of collected shares is {count}. Reconstruction requires at least {t}.")
        }
        InvalidLength(length: usize) {
            description("Invalid instance bit length")
            display("Invalid instance bit length: {}", length)
        }
        InvalidParameterSet(n: usize, t: usize){
            description("Invalid Parameter Set")
            display("Invalid Parameter Set: n = {}, t = {}.\nValid params: 1 <= t <= n", n, t)
        }
        NonInvertibleKey {
            description("The private key is not coprime to q-1 and cannot decrypt a share")
            display("The private key is not coprime to q-1 and cannot decrypt a share")
        }
        UnknownPublicKey(t: String) {
            description("Public key does not appear in the distribution bundle")
            display("Public key does not appear in the distribution bundle: '{}'", t)
        }
    }
}
