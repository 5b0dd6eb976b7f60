// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.
#![no_main]

use jpeglite::{DecoderOptions, decode_with_options};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let options = DecoderOptions {
        pixel_limit: Some(1 << 22),
    };
    if let Ok(image) = decode_with_options(data, &options) {
        assert_eq!(image.data().len(), image.width() * image.height() * 3);
    }
});
