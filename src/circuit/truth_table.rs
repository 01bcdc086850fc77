use crate::error::{Error, Result};
use bitvec::vec::BitVec;

/// Immutable lookup structure mapping an ordered tuple of binary inputs to a binary output.
///
/// Conceptually a complete binary tree of depth [TruthTable::input_count] whose leaves are the outputs,
/// the first input picks the left (0) or right (1) half, the second input picks a half of that half and so on.
/// The tree is stored implicitly: the leaves are kept in a [BitVec] in the standard truth table order,
/// so descending one level means doubling the position and adding the input.
///
/// # Example
/// ```
/// # use gatesim::circuit::TruthTable;
/// let xor = TruthTable::new("xor", &[0, 1, 1, 0]).unwrap();
///
/// assert_eq!(xor.input_count(), 2);
/// assert_eq!(xor.output(&[true, false]).unwrap(), true);
/// assert_eq!(xor.output(&[true, true]).unwrap(), false);
/// ```
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct TruthTable {
    name: String,
    leaves: BitVec,
    input_count: usize,
}

impl TruthTable {
    /// Returns a new [TruthTable] built from `outputs`, listed in the standard order
    /// (the inputs read as an incrementing binary counter, first input most significant).
    ///
    /// Fails if the length of `outputs` is not a power of two >= 2 or if any entry is not 0 or 1.
    pub fn new<S: Into<String>>(name: S, outputs: &[u8]) -> Result<TruthTable> {
        let name = name.into();
        if outputs.len() < 2 || !outputs.len().is_power_of_two() {
            return Err(Error::InvalidTableLength {
                name,
                len: outputs.len(),
            });
        }
        let mut leaves = BitVec::with_capacity(outputs.len());
        Self::build(&name, outputs, &mut leaves)?;
        let input_count = Self::depth(leaves.len());

        Ok(TruthTable {
            name,
            leaves,
            input_count,
        })
    }

    /// Splits `outputs` in halves until reaching pairs, validating and appending the leaves in order.
    // `outputs.len()` is a power of two >= 2 here.
    fn build(name: &str, outputs: &[u8], leaves: &mut BitVec) -> Result<()> {
        if outputs.len() == 2 {
            for &value in outputs {
                match value {
                    0 => leaves.push(false),
                    1 => leaves.push(true),
                    value => {
                        return Err(Error::InvalidTableValue {
                            name: name.into(),
                            value,
                        })
                    }
                }
            }
            return Ok(());
        }
        let (low, high) = outputs.split_at(outputs.len() / 2);
        Self::build(name, low, leaves)?;
        Self::build(name, high, leaves)
    }

    /// Number of levels between the root and the leaves.
    fn depth(leaf_count: usize) -> usize {
        let mut depth = 0;
        let mut width = leaf_count;
        while width > 1 {
            width /= 2;
            depth += 1;
        }
        depth
    }

    /// Returns the name of the table.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the number of binary inputs the table takes.
    pub fn input_count(&self) -> usize {
        self.input_count
    }

    /// Returns the leaf reached by following `inputs` in order from the root.
    ///
    /// Fails if `inputs.len()` != [TruthTable::input_count].
    pub fn output(&self, inputs: &[bool]) -> Result<bool> {
        if inputs.len() != self.input_count {
            return Err(Error::InputCountMismatch {
                name: self.name.clone(),
                expected: self.input_count,
                actual: inputs.len(),
            });
        }
        let leaf = inputs
            .iter()
            .fold(0, |node, &input| node * 2 + usize::from(input));
        Ok(self.leaves[leaf])
    }
}
