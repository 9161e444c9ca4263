use serde::{Deserialize, Serialize};

/// A single person listed on an organization's board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardMember {
    pub name: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
}

/// Outcome of a discovery run: the last candidate tried and whatever board
/// list was extracted from it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DiscoveryResult {
    pub url: Option<String>,
    pub board: Option<Vec<BoardMember>>,
}

/// A board list is trusted only when it holds strictly more than `threshold`
/// members.
pub fn is_accepted(board: &Option<Vec<BoardMember>>, threshold: usize) -> bool {
    match board {
        Some(members) => members.len() > threshold,
        None => false,
    }
}
