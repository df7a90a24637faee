use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LpType {
    Min,
    Max,
}

impl fmt::Display for LpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", match self { LpType::Min => "MIN", LpType::Max => "MAX" })
    }
}
