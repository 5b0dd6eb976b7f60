// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

mod parallel;
pub mod tracing_wrappers;

pub(crate) use parallel::*;

pub trait CeilDiv {
    fn ceil_div(self, rhs: Self) -> Self;
}

impl CeilDiv for usize {
    #[inline]
    fn ceil_div(self, rhs: usize) -> usize {
        self.div_ceil(rhs)
    }
}

/// Returns `value` rounded up to the next multiple of `multiple`.
#[inline]
pub fn round_up_to(value: usize, multiple: usize) -> usize {
    value.ceil_div(multiple) * multiple
}
