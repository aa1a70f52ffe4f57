/// Iterator over every way of writing `total` as an ordered sum of
/// `parts` non-negative integers, in lexicographic order starting from
/// `[0, .., 0, total]`.
///
/// There are `C(total + parts - 1, parts - 1)` of them.
#[derive(Debug, Clone)]
pub struct Compositions {
    current: Vec<usize>,
    total: usize,
    done: bool,
}

impl Compositions {
    pub fn new(total: usize, parts: usize) -> Self {
        let mut current = vec![0; parts];
        if let Some(last) = current.last_mut() {
            *last = total;
        }
        Self {
            current,
            total,
            done: parts == 0,
        }
    }

    // Moves `current` to its lexicographic successor, or reports that
    // it was the last one.
    fn advance(&mut self) -> bool {
        let parts = self.current.len();
        if parts < 2 {
            return false;
        }
        let prefix = &mut self.current[..parts - 1];
        let used: usize = prefix.iter().sum();

        if used < self.total {
            prefix[parts - 2] += 1;
        } else {
            match prefix.iter().rposition(|&p| p > 0) {
                Some(pos) if pos > 0 => {
                    prefix[pos] = 0;
                    prefix[pos - 1] += 1;
                }
                _ => return false,
            }
        }

        let used: usize = self.current[..parts - 1].iter().sum();
        self.current[parts - 1] = self.total - used;
        true
    }
}

impl Iterator for Compositions {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let item = self.current.clone();
        self.done = !self.advance();
        Some(item)
    }
}
