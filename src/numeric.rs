use statrs::function::factorial::binomial;

/// P(X = k) for X ~ Binomial(n, p). Zero when k > n.
pub fn binomial_pmf(n: usize, k: usize, p: f64) -> f64 {
    if k > n {
        return 0.0;
    }
    // powi(0) is 1 even for a zero base, so p = 0 and p = 1 need no special case
    binomial(n as u64, k as u64) * p.powi(k as i32) * (1.0 - p).powi((n - k) as i32)
}

/// Scale `values` in place so they sum to 1. Returns the original sum.
pub fn normalize(values: &mut [f64]) -> f64 {
    let total: f64 = values.iter().sum();
    if total > 0.0 {
        for v in values.iter_mut() {
            *v /= total;
        }
    }
    total
}
