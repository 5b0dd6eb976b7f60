// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

#![deny(unsafe_code)]
pub mod bit_reader;
pub mod bit_writer;
pub mod byte_io;
pub mod codec;
pub mod color;
pub mod container;
pub mod entropy_coding;
pub mod error;
pub mod image;
pub mod preprocess;
pub mod quantizer;
pub mod util;
pub mod zigzag;

pub use codec::{
    DecoderOptions, EncoderOptions, decode, decode_container, decode_with_options, encode,
    encode_container, encode_with_options, inspect, read_header,
};
pub use container::{Container, ContainerStats, Header};
pub use error::{Error, Result};
pub use image::RgbImage;
pub use quantizer::Quality;
