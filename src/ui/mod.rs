/// Terminal I/O: the diff renderer and the non-blocking input source.

pub mod input;
pub mod renderer;
