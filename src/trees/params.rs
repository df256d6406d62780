/// Which values an ID3 node branches on once it has chosen its attribute.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BranchValues {
    /// Only the values present in the rows reaching the node.
    #[default]
    Observed,
    /// Every value the attribute takes anywhere in the training set.
    ///
    /// A value with no rows at a node turns that node into a leaf holding
    /// the node's majority class.
    Domain,
}

#[derive(Clone, Debug, Default)]
pub struct Id3Params {
    pub branch_values: BranchValues,
}

impl Id3Params {
    pub fn new() -> Self {
        Self {
            branch_values: BranchValues::Observed,
        }
    }

    pub fn set_branch_values(&mut self, branch_values: BranchValues) {
        self.branch_values = branch_values;
    }

    pub fn branch_values(&self) -> BranchValues {
        self.branch_values
    }
}
