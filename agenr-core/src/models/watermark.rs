/// Per-consumer rowid watermark for the signal stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Watermark {
    pub max_seq: i64,
}

impl Watermark {
    pub fn new(max_seq: i64) -> Self {
        Self { max_seq }
    }
}
