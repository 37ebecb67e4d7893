//! Fixed-size batching over an instruction stream.

use esi_model::ConfigError;

/// Groups an item stream into fixed-size batches, lazily.
///
/// Every batch has exactly `size` elements except possibly the last, which
/// has between one and `size`; empty batches are never produced and order is
/// preserved exactly. Laziness matters here: the streaming input path hands
/// this adapter an iterator that is still reading the file, so at most one
/// batch is ever buffered.
///
/// # Errors
///
/// A zero `size` is a configuration error, returned before anything is
/// consumed from the stream.
pub fn batched<I>(items: I, size: usize) -> Result<Batched<I::IntoIter>, ConfigError>
where
    I: IntoIterator,
{
    if size == 0 {
        return Err(ConfigError::InvalidBulkSize { size });
    }
    Ok(Batched {
        items: items.into_iter(),
        size,
    })
}

/// Lazy batch iterator returned by [`batched`].
#[derive(Debug)]
pub struct Batched<I> {
    items: I,
    size: usize,
}

impl<I: Iterator> Iterator for Batched<I> {
    type Item = Vec<I::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut batch = Vec::new();
        while batch.len() < self.size {
            match self.items.next() {
                Some(item) => batch.push(item),
                None => break,
            }
        }
        if batch.is_empty() { None } else { Some(batch) }
    }
}

#[cfg(test)]
mod tests {
    use super::batched;
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};

    #[test]
    fn splits_into_full_batches_with_short_tail() {
        let batches: Vec<Vec<u32>> = batched(vec![1, 2, 3, 4, 5], 2).unwrap().collect();
        assert_eq!(batches, vec![vec![1, 2], vec![3, 4], vec![5]]);
    }

    #[test]
    fn input_smaller_than_size_yields_one_batch() {
        let batches: Vec<Vec<u32>> = batched(vec![1, 2], 10).unwrap().collect();
        assert_eq!(batches, vec![vec![1, 2]]);
    }

    #[test]
    fn empty_input_yields_no_batches() {
        let batches: Vec<Vec<u32>> = batched(Vec::new(), 3).unwrap().collect();
        assert!(batches.is_empty());
    }

    #[test]
    fn zero_size_is_rejected_before_batching() {
        assert!(batched(vec![1, 2, 3], 0).is_err());
    }

    #[test]
    fn consumes_the_stream_lazily() {
        let pulled = std::cell::Cell::new(0);
        let counted = (0..10).inspect(|_| pulled.set(pulled.get() + 1));
        let mut batches = batched(counted, 4).unwrap();
        assert_eq!(batches.next().unwrap(), vec![0, 1, 2, 3]);
        assert_eq!(pulled.get(), 4);
    }

    proptest! {
        #[test]
        fn batching_laws(
            items in proptest::collection::vec(0usize..1000, 0..200),
            size in 1usize..50,
        ) {
            let batches: Vec<Vec<usize>> = batched(items.clone(), size).unwrap().collect();

            prop_assert_eq!(batches.len(), items.len().div_ceil(size));
            for batch in batches.iter().take(batches.len().saturating_sub(1)) {
                prop_assert_eq!(batch.len(), size);
            }
            if let Some(last) = batches.last() {
                prop_assert!(!last.is_empty() && last.len() <= size);
                prop_assert_eq!(last.len(), items.len() - size * ((items.len() - 1) / size));
            }

            let flattened: Vec<usize> = batches.concat();
            prop_assert_eq!(flattened, items);
        }
    }
}
