/// Number of ways to choose `k` items out of `n` without repetition, order irrelevant.
///
/// Uses the multiplicative formula over the smaller of `k` and `n - k`, so each
/// intermediate product stays divisible by the running denominator. Out of range inputs
/// (`k < 0` or `k > n`) have no ways to be chosen. Results that don't fit in a `u64`
/// saturate.
pub fn binomial(n: i64, k: i64) -> u64 {
    if k < 0 || k > n {
        return 0;
    }

    let k = k.min(n - k);
    let mut result: u128 = 1;
    for i in 0..k {
        result = result * (n - i) as u128 / (i + 1) as u128;
        if result > u64::MAX as u128 {
            return u64::MAX;
        }
    }
    result as u64
}

/// Iterator over every `k`-sized subset of `items`, in lexicographic order of positions.
///
/// For a sorted `items` this is also lexicographic order of the values.
pub struct Combinations<'a, T> {
    items: &'a [T],
    indices: Vec<usize>,
    done: bool,
}

impl<'a, T> Combinations<'a, T> {
    pub fn new(items: &'a [T], k: usize) -> Self {
        Self {
            items,
            indices: (0..k).collect(),
            done: k > items.len(),
        }
    }

    // move to the next set of indices, returns false once every subset has been produced
    fn advance(&mut self) -> bool {
        let n = self.items.len();
        let k = self.indices.len();

        // find the right most index that can still move to the right
        let mut i = k;
        while i > 0 {
            i -= 1;
            if self.indices[i] < n - k + i {
                self.indices[i] += 1;
                for j in i + 1..k {
                    self.indices[j] = self.indices[j - 1] + 1;
                }
                return true;
            }
        }
        false
    }
}

impl<'a, T: Clone> Iterator for Combinations<'a, T> {
    type Item = Vec<T>;

    fn next(&mut self) -> Option<Vec<T>> {
        if self.done {
            return None;
        }

        let current = self
            .indices
            .iter()
            .map(|&idx| self.items[idx].clone())
            .collect();

        if !self.advance() {
            self.done = true;
        }

        Some(current)
    }
}
