//! `embedded_io` integration for buffered streams.
//!
//! `BufferedStream` already speaks bytes; this module only maps its API onto
//! the blocking `Read`/`Write`/`Seek` traits so it can be handed to any code
//! written against `embedded_io`. All failures keep their `StreamError` form.

mod embedded_io_impl;
