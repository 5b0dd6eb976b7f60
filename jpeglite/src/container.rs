// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! The container: a 6-byte header followed by the DC and AC sub-streams of
//! Y, Cb and Cr, in that order. All integers are big-endian.
//!
//! ```text
//! u16 height, u16 width, u8 block size, u8 quality
//! DC-Y, AC-Y, DC-Cb, AC-Cb, DC-Cr, AC-Cr
//! ```

use std::fmt;

use crate::{
    byte_io::{ByteReader, ByteWriter},
    entropy_coding::{ac::AcSymbol, dc::DcSymbol, stream::SubStream},
    error::{Error, Result},
    preprocess::{CHROMA_FACTOR, block_grid_size, downsampled_size},
    quantizer::Quality,
    util::tracing_wrappers::*,
};

pub const HEADER_BYTES: usize = 6;
pub const MIN_BLOCK_SIZE: usize = 2;
pub const MAX_BLOCK_SIZE: usize = jpeglite_transforms::MAX_BLOCK_DIM;

pub fn check_block_size(block_size: usize) -> Result<usize> {
    if !(MIN_BLOCK_SIZE..=MAX_BLOCK_SIZE).contains(&block_size) {
        return Err(Error::InvalidBlockSize(block_size));
    }
    Ok(block_size)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Header {
    pub height: u16,
    pub width: u16,
    pub block_size: u8,
    pub quality: Quality,
}

impl Header {
    pub fn new(width: usize, height: usize, block_size: usize, quality: Quality) -> Result<Header> {
        let too_large = || Error::ImageSizeTooLarge(width, height);
        let width16 = u16::try_from(width).map_err(|_| too_large())?;
        let height16 = u16::try_from(height).map_err(|_| too_large())?;
        if width == 0 || height == 0 {
            return Err(Error::InvalidImageSize(width, height));
        }
        Ok(Header {
            height: height16,
            width: width16,
            block_size: check_block_size(block_size)? as u8,
            quality,
        })
    }

    pub fn read(br: &mut ByteReader) -> Result<Header> {
        let height = br.read_u16()?;
        let width = br.read_u16()?;
        let block_size = br.read_u8()?;
        let quality = Quality::new(br.read_u8()? as u32)?;
        let header = Header::new(width as usize, height as usize, block_size as usize, quality)?;
        debug!(?header, "read header");
        Ok(header)
    }

    pub fn write(&self, out: &mut ByteWriter) {
        out.write_u16(self.height);
        out.write_u16(self.width);
        out.write_u8(self.block_size);
        out.write_u8(self.quality.get());
    }

    /// `(width, height)` of the luma plane.
    pub fn luma_size(&self) -> (usize, usize) {
        (self.width as usize, self.height as usize)
    }

    /// `(width, height)` of the chroma planes.
    pub fn chroma_size(&self) -> (usize, usize) {
        downsampled_size(self.luma_size(), CHROMA_FACTOR)
    }

    /// Plane size of each channel, Y, Cb, Cr.
    pub fn plane_sizes(&self) -> [(usize, usize); 3] {
        [self.luma_size(), self.chroma_size(), self.chroma_size()]
    }

    /// Number of blocks covering a plane of `size`.
    pub fn block_count(&self, size: (usize, usize)) -> usize {
        let (bx, by) = block_grid_size(size, self.block_size as usize);
        bx * by
    }

    /// AC coefficients per block.
    pub fn ac_per_block(&self) -> usize {
        let n = self.block_size as usize;
        n * n - 1
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Channel {
    Y,
    Cb,
    Cr,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Y, Channel::Cb, Channel::Cr];
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Channel::Y => "Y",
            Channel::Cb => "Cb",
            Channel::Cr => "Cr",
        };
        f.write_str(name)
    }
}

/// DC and AC sub-streams of one channel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChannelStreams {
    pub dc: SubStream<DcSymbol>,
    pub ac: SubStream<AcSymbol>,
}

/// A parsed container.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Container {
    pub header: Header,
    pub channels: [ChannelStreams; 3],
}

impl Container {
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut out = ByteWriter::new();
        self.header.write(&mut out);
        for streams in &self.channels {
            streams.dc.write(&mut out)?;
            streams.ac.write(&mut out)?;
        }
        Ok(out.into_inner())
    }

    pub fn parse(bytes: &[u8]) -> Result<Container> {
        let mut br = ByteReader::new(bytes);
        let header = Header::read(&mut br)?;
        let mut read_channel = || -> Result<ChannelStreams> {
            let dc = SubStream::read(&mut br)?;
            let ac = SubStream::read(&mut br)?;
            Ok(ChannelStreams { dc, ac })
        };
        let channels = [read_channel()?, read_channel()?, read_channel()?];
        if br.remaining() != 0 {
            return Err(Error::TrailingData(br.remaining()));
        }
        Ok(Container { header, channels })
    }

    pub fn stats(&self) -> ContainerStats {
        let mut sub_streams = Vec::with_capacity(6);
        for (channel, streams) in Channel::ALL.into_iter().zip(&self.channels) {
            sub_streams.push(SubStreamStats {
                channel,
                class: CoefficientClass::Dc,
                entries: streams.dc.table.len(),
                payload_bytes: streams.dc.payload.len(),
                padding: streams.dc.padding,
                encoded_bytes: streams.dc.encoded_len(),
            });
            sub_streams.push(SubStreamStats {
                channel,
                class: CoefficientClass::Ac,
                entries: streams.ac.table.len(),
                payload_bytes: streams.ac.payload.len(),
                padding: streams.ac.padding,
                encoded_bytes: streams.ac.encoded_len(),
            });
        }
        ContainerStats {
            header: self.header,
            sub_streams,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CoefficientClass {
    Dc,
    Ac,
}

impl fmt::Display for CoefficientClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CoefficientClass::Dc => "DC",
            CoefficientClass::Ac => "AC",
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubStreamStats {
    pub channel: Channel,
    pub class: CoefficientClass,
    /// Frequency table entries.
    pub entries: usize,
    pub payload_bytes: usize,
    pub padding: u8,
    /// Serialized size, framing included.
    pub encoded_bytes: usize,
}

/// Per-sub-stream sizes of a container.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContainerStats {
    pub header: Header,
    pub sub_streams: Vec<SubStreamStats>,
}

impl ContainerStats {
    pub fn total_bytes(&self) -> usize {
        HEADER_BYTES + self.sub_streams.iter().map(|s| s.encoded_bytes).sum::<usize>()
    }
}
