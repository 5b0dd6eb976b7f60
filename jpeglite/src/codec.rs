// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::borrow::Cow;

use jpeglite_transforms::DctMatrix;

use crate::{
    byte_io::ByteReader,
    color,
    container::{ChannelStreams, Container, ContainerStats, Header, check_block_size},
    entropy_coding::{ac, dc},
    error::{Error, Result},
    image::{Plane, RgbImage},
    preprocess::{
        BlockGrid, CHROMA_FACTOR, block_grid_size, downsample, merge_blocks, split_blocks,
        upsample,
    },
    quantizer::{ChannelKind, Quality, QuantTable},
    util::{tracing_wrappers::*, try_map3},
    zigzag::ZigzagOrder,
};

pub const DEFAULT_BLOCK_SIZE: usize = 8;

/// Encoder settings. The block size is stored in the container, so any
/// supported value can be decoded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EncoderOptions {
    pub quality: Quality,
    pub block_size: usize,
}

impl Default for EncoderOptions {
    fn default() -> Self {
        EncoderOptions {
            quality: Quality::default(),
            block_size: DEFAULT_BLOCK_SIZE,
        }
    }
}

impl EncoderOptions {
    pub fn with_quality(mut self, quality: Quality) -> Self {
        self.quality = quality;
        self
    }

    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size;
        self
    }
}

/// Per-block transform state shared by the three channels.
struct BlockCoder<'a> {
    block_size: usize,
    dct: Cow<'a, DctMatrix>,
    zigzag: ZigzagOrder,
}

impl BlockCoder<'static> {
    fn new(block_size: usize) -> Result<Self> {
        let dct = if block_size == DEFAULT_BLOCK_SIZE {
            Cow::Borrowed(DctMatrix::block8())
        } else {
            Cow::Owned(DctMatrix::new(block_size)?)
        };
        Ok(BlockCoder {
            block_size,
            dct,
            zigzag: ZigzagOrder::new(block_size),
        })
    }
}

impl BlockCoder<'_> {
    /// DCT, quantization and zigzag scan of one block.
    fn forward(&self, table: &QuantTable, block: &[f64]) -> Result<Vec<i32>> {
        let n = self.block_size;
        let mut coeffs = block.to_vec();
        self.dct.forward(n, n, &mut coeffs)?;
        self.zigzag.scan(&table.quantize(&coeffs)?)
    }

    fn inverse(&self, table: &QuantTable, sequence: &[i32]) -> Result<Vec<f64>> {
        let n = self.block_size;
        let mut block = table.dequantize(&self.zigzag.unscan(sequence)?)?;
        self.dct.inverse(n, n, &mut block)?;
        Ok(block)
    }
}

/// Encodes `image` with the given quality (1..=100) and 8×8 blocks.
pub fn encode(image: &RgbImage, quality: u32) -> Result<Vec<u8>> {
    let options = EncoderOptions::default().with_quality(Quality::new(quality)?);
    encode_with_options(image, &options)
}

pub fn encode_with_options(image: &RgbImage, options: &EncoderOptions) -> Result<Vec<u8>> {
    encode_container(image, options)?.to_bytes()
}

/// Runs the encoder and returns the container before serialization.
#[instrument(skip(image), fields(width = image.width(), height = image.height()), err)]
pub fn encode_container(image: &RgbImage, options: &EncoderOptions) -> Result<Container> {
    let block_size = check_block_size(options.block_size)?;
    let header = Header::new(image.width(), image.height(), block_size, options.quality)?;
    debug!(?header, "writing header");
    let coder = BlockCoder::new(block_size)?;

    let [y, cb, cr] = color::to_planes(image)?;
    let inputs = [
        (y, ChannelKind::Luma),
        (downsample(&cb, CHROMA_FACTOR)?, ChannelKind::Chroma),
        (downsample(&cr, CHROMA_FACTOR)?, ChannelKind::Chroma),
    ];
    let channels = try_map3(inputs, |(plane, kind)| {
        encode_channel(&coder, &plane, kind, options.quality)
    })?;
    Ok(Container { header, channels })
}

#[instrument(level = "debug", skip(coder, plane), err)]
fn encode_channel(
    coder: &BlockCoder,
    plane: &Plane,
    kind: ChannelKind,
    quality: Quality,
) -> Result<ChannelStreams> {
    let table = QuantTable::for_quality(kind, quality, coder.block_size);
    let grid = split_blocks(plane, coder.block_size)?;
    let coeffs = grid.try_map(|block| coder.forward(&table, block))?;

    let blocks = coeffs.into_blocks();
    let dc_values: Vec<i32> = blocks.iter().map(|b| b[0]).collect();
    let mut ac_values = Vec::new();
    ac_values.try_reserve_exact(blocks.len() * (coder.block_size * coder.block_size - 1))?;
    for b in &blocks {
        ac_values.extend_from_slice(&b[1..]);
    }
    Ok(ChannelStreams {
        dc: dc::encode_dc(&dc_values)?,
        ac: ac::encode_ac(&ac_values)?,
    })
}

/// Decoder settings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DecoderOptions {
    /// Largest accepted `width * height`; `None` accepts any size the
    /// header can express.
    pub pixel_limit: Option<usize>,
}

/// Decodes a container produced by [encode].
pub fn decode(bytes: &[u8]) -> Result<RgbImage> {
    decode_with_options(bytes, &DecoderOptions::default())
}

#[instrument(skip(bytes), fields(bytes = bytes.len()), err)]
pub fn decode_with_options(bytes: &[u8], options: &DecoderOptions) -> Result<RgbImage> {
    let container = Container::parse(bytes)?;
    let (width, height) = container.header.luma_size();
    if options.pixel_limit.is_some_and(|limit| width * height > limit) {
        return Err(Error::ImageSizeTooLarge(width, height));
    }
    decode_container(&container)
}

pub fn decode_container(container: &Container) -> Result<RgbImage> {
    let header = &container.header;
    let coder = BlockCoder::new(header.block_size as usize)?;
    let sizes = header.plane_sizes();
    let [y, cb, cr] = try_map3([0, 1, 2], |c| {
        decode_channel(
            &coder,
            header,
            &container.channels[c],
            sizes[c],
            ChannelKind::ALL[c],
        )
    })?;
    let luma_size = header.luma_size();
    let cb = upsample(&cb, CHROMA_FACTOR, luma_size)?;
    let cr = upsample(&cr, CHROMA_FACTOR, luma_size)?;
    color::from_planes(&[y, cb, cr])
}

#[instrument(level = "debug", skip(coder, header, streams), err)]
fn decode_channel(
    coder: &BlockCoder,
    header: &Header,
    streams: &ChannelStreams,
    size: (usize, usize),
    kind: ChannelKind,
) -> Result<Plane> {
    let n = coder.block_size;
    let (blocks_x, blocks_y) = block_grid_size(size, n);
    let count = blocks_x * blocks_y;
    let ac_per_block = header.ac_per_block();
    let dc_values = dc::decode_dc(&streams.dc, count)?;
    let ac_values = ac::decode_ac(&streams.ac, count * ac_per_block)?;

    let mut sequences = Vec::new();
    sequences.try_reserve_exact(count)?;
    for (i, &dc) in dc_values.iter().enumerate() {
        let mut sequence = Vec::with_capacity(n * n);
        sequence.push(dc);
        sequence.extend_from_slice(&ac_values[i * ac_per_block..(i + 1) * ac_per_block]);
        sequences.push(sequence);
    }
    let grid = BlockGrid::from_blocks(n, blocks_x, blocks_y, sequences)?;
    let table = QuantTable::for_quality(kind, header.quality, n);
    let pixels = grid.try_map(|sequence| coder.inverse(&table, sequence))?;
    merge_blocks(&pixels)?.crop(size)
}

/// Reads only the container header.
pub fn read_header(bytes: &[u8]) -> Result<Header> {
    Header::read(&mut ByteReader::new(bytes))
}

/// Parses a container and reports the size of each sub-stream.
pub fn inspect(bytes: &[u8]) -> Result<ContainerStats> {
    Ok(Container::parse(bytes)?.stats())
}
