//! Prime search used to size grown bucket arrays.

/// Trial division by odd divisors up to `sqrt(n)`.
pub fn is_prime(n: usize) -> bool {
    if n < 2 {
        return false;
    }
    if n % 2 == 0 {
        return n == 2;
    }
    let mut d = 3usize;
    while d <= n / d {
        if n % d == 0 {
            return false;
        }
        d += 2;
    }
    true
}

/// Smallest prime `>= lower_bound`. Odd for every bound above 2.
pub fn next_prime(lower_bound: usize) -> usize {
    if lower_bound <= 2 {
        return 2;
    }
    let mut candidate = lower_bound | 1;
    while !is_prime(candidate) {
        candidate = candidate
            .checked_add(2)
            .expect("capacity overflow while searching for a prime");
    }
    candidate
}
