use std::fmt;

#[derive(Clone, Copy, PartialEq)]
pub struct Connection {
    pub target: usize,
    pub weight: f32,
}

impl Connection {
    /// Creates a new Connection with the specified
    /// target node index and weight.
    pub fn new(target: usize, weight: f32) -> Connection {
        Connection { target, weight }
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:.9}", self.target, self.weight)
    }
}
