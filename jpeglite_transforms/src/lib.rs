// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

pub mod dct;

pub use dct::{DctMatrix, MAX_BLOCK_DIM, TransformError};

#[cfg(test)]
mod tests;
