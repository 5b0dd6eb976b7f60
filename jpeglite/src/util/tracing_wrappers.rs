// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

#[cfg(feature = "tracing")]
#[allow(unused_imports)]
pub use tracing::{debug, instrument, trace};

#[cfg(not(feature = "tracing"))]
pub use jpeglite_macros::noop as instrument;

#[cfg(not(feature = "tracing"))]
mod noop_macros {
    macro_rules! debug {
        ($($arg:tt)+) => {};
    }
    macro_rules! trace {
        ($($arg:tt)+) => {};
    }

    pub(crate) use {debug, trace};
}

#[cfg(not(feature = "tracing"))]
pub(crate) use noop_macros::*;

#[cfg(test)]
mod test {
    use super::*;

    #[instrument(level = "debug", err)]
    fn traced(x: u32) -> Result<u32, String> {
        debug!(x, "called");
        trace!("done");
        Ok(x + 1)
    }

    #[test]
    fn wrappers_pass_through() {
        assert_eq!(traced(1), Ok(2));
    }
}
