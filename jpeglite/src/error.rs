// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::collections::TryReserveError;

use jpeglite_transforms::TransformError;
use thiserror::Error;

use crate::entropy_coding::magnitude::MAX_CATEGORY;

#[derive(Error, Debug)]
pub enum Error {
    // Invalid parameters.
    #[error("Invalid quality {0}, must be in 1..=100")]
    InvalidQuality(u32),
    #[error("Invalid block size {0}, must be in 2..=32")]
    InvalidBlockSize(usize),
    #[error("Invalid image size: {0}x{1}")]
    InvalidImageSize(usize, usize),
    #[error("Image size too large: {0}x{1}")]
    ImageSizeTooLarge(usize, usize),
    #[error("Pixel buffer has {found} bytes, expected {expected}")]
    PixelBufferSize { expected: usize, found: usize },
    #[error("Block has {found} samples, expected {expected}")]
    BlockSizeMismatch { expected: usize, found: usize },
    #[error("Block grid has {found} blocks, expected {expected}")]
    BlockCountMismatch { expected: usize, found: usize },
    #[error("Transform error: {0}")]
    Transform(#[from] TransformError),
    // Corrupt container.
    #[error("File truncated")]
    FileTruncated,
    #[error("Read out of bounds")]
    OutOfBounds,
    #[error("Frequency table with {entries} entries needs {needed} bytes, only {available} left")]
    FrequencyTableTruncated {
        entries: usize,
        needed: usize,
        available: usize,
    },
    #[error("Frequency table entries are not sorted in strictly ascending order")]
    UnsortedFrequencyTable,
    #[error("Frequency table has no symbol with a non-zero count")]
    EmptyFrequencyTable,
    #[error("Invalid padding bit count {padding} for a {payload_bytes}-byte payload")]
    InvalidPadding { padding: u8, payload_bytes: usize },
    #[error("Bitstream ends in the middle of a Huffman code")]
    IncompleteHuffmanCode,
    #[error("Invalid category {0}, max is {MAX_CATEGORY}")]
    InvalidCategory(u8),
    #[error("Symbol {0} has no code in the frequency table")]
    SymbolNotInTable(String),
    #[error("Frequency table has {0} entries, at most 65535 fit in a sub-stream")]
    FrequencyTableTooLarge(usize),
    #[error("Sub-stream payload of {0} bytes does not fit in the container")]
    PayloadTooLarge(usize),
    #[error("{0} unexpected bytes after the last sub-stream")]
    TrailingData(usize),
    // Resources.
    #[error("Huffman code longer than {0} bits")]
    HuffmanCodeTooLong(usize),
    #[error("Out of memory: {0}")]
    OutOfMemory(#[from] TryReserveError),
    // Generic arithmetic overflow. Prefer using other errors if possible.
    #[error("Arithmetic overflow")]
    ArithmeticOverflow,
}

pub type Result<T> = std::result::Result<T, Error>;
