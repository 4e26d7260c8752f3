mod common;
mod compose;
