// SPDX-License-Identifier: BSD-2-Clause
/*
 * Copyright © The dots-coap Contributors, all rights reserved.
 * This file is part of the dots-coap project, see the README file for
 * general information on this project and the NOTICE.md and LICENSE files
 * for information regarding copyright ownership and terms of use.
 *
 * protocol.rs - Types and encodings defined by CoAP and its extensions.
 */

//! Various types that are specified and defined in the CoAP standard and its extensions.

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

use crate::error::OptionValueError;

pub type CoapToken = Box<[u8]>;
pub type CoapOptionNum = u16;
pub type Observe = u32;
pub type Block = u32;
pub type Size = u32;

/// Largest block size exponent usable with CoAP over UDP/DTLS (1024 byte blocks).
pub const MAX_BLOCK_SIZE_EXPONENT: u8 = 6;

/// CoAP option types relevant for observing resources and blockwise transfers.
///
/// The enum value corresponds to the appropriate option number and can be retrieved using
/// `[value] as u16` or [to_raw_option_num()](CoapOptionType::to_raw_option_num()).
///
/// See <https://www.iana.org/assignments/core-parameters/core-parameters.xhtml#option-numbers> for a
/// list of option numbers registered with the IANA.
#[repr(u16)]
#[non_exhaustive]
#[derive(FromPrimitive, Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CoapOptionType {
    /// Observe option ([RFC 7641, Section 2](https://datatracker.ietf.org/doc/html/rfc7641#section-2)).
    Observe = 6,
    /// Uri-Query option ([RFC 7252, Section 5.10.1](https://datatracker.ietf.org/doc/html/rfc7252#section-5.10.1)).
    UriQuery = 15,
    /// Block2 option ([RFC 7959, Section 2.1](https://datatracker.ietf.org/doc/html/rfc7959#section-2.1)).
    Block2 = 23,
    /// Block1 option ([RFC 7959, Section 2.1](https://datatracker.ietf.org/doc/html/rfc7959#section-2.1)).
    Block1 = 27,
    /// Size2 option ([RFC 7959, Section 4](https://datatracker.ietf.org/doc/html/rfc7959#section-4)).
    Size2 = 28,
}

impl CoapOptionType {
    /// Returns the option number this type belongs to.
    pub fn to_raw_option_num(self) -> CoapOptionNum {
        self as u16
    }

    /// Returns the option type for the given option number, if it is one of the supported types.
    pub fn from_raw_option_num(num: CoapOptionNum) -> Option<CoapOptionType> {
        <CoapOptionType as FromPrimitive>::from_u16(num)
    }

    /// Returns the maximum size in bytes that a value of this option type should have.
    pub fn max_len(&self) -> usize {
        match self {
            CoapOptionType::Observe => 3,
            CoapOptionType::UriQuery => 255,
            CoapOptionType::Block2 => 3,
            CoapOptionType::Block1 => 3,
            CoapOptionType::Size2 => 4,
        }
    }
}

/// Action requested by the value of an Observe option in a request, see
/// [RFC 7641, Section 2](https://datatracker.ietf.org/doc/html/rfc7641#section-2).
#[repr(u32)]
#[derive(FromPrimitive, Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ObserveAction {
    Register = 0,
    Deregister = 1,
}

impl ObserveAction {
    /// Decodes the value of an Observe option, returning `None` for values other than 0 and 1.
    pub fn from_option_value(value: &[u8]) -> Option<ObserveAction> {
        let value = decode_var_uint(value).ok()?;
        <ObserveAction as FromPrimitive>::from_u32(value)
    }

    pub fn to_option_value(self) -> Box<[u8]> {
        encode_var_uint(self as u32)
    }
}

/// Parameters of a Block1 or Block2 option, see
/// [RFC 7959, Section 2.2](https://datatracker.ietf.org/doc/html/rfc7959#section-2.2).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct BlockParams {
    num: u32,
    more: bool,
    size_exponent: u8,
}

impl BlockParams {
    /// Largest block number that fits into the three byte option value.
    pub const MAX_NUM: u32 = (1 << 20) - 1;

    /// Creates block parameters for block number `num` with a block size of
    /// `2^(size_exponent + 4)` bytes.
    ///
    /// # Errors
    ///
    /// Will return [`OptionValueError::InvalidBlockSizeExponent`] if `size_exponent` is larger than
    /// [`MAX_BLOCK_SIZE_EXPONENT`] and [`OptionValueError::TooLong`] if `num` does not fit into a
    /// block option.
    pub fn new(num: u32, more: bool, size_exponent: u8) -> Result<BlockParams, OptionValueError> {
        if size_exponent > MAX_BLOCK_SIZE_EXPONENT {
            return Err(OptionValueError::InvalidBlockSizeExponent(size_exponent));
        }
        if num > BlockParams::MAX_NUM {
            return Err(OptionValueError::TooLong);
        }
        Ok(BlockParams {
            num,
            more,
            size_exponent,
        })
    }

    pub fn num(&self) -> u32 {
        self.num
    }

    pub fn more(&self) -> bool {
        self.more
    }

    pub fn size_exponent(&self) -> u8 {
        self.size_exponent
    }

    /// Returns the block size in bytes.
    pub fn size(&self) -> usize {
        16 << self.size_exponent
    }

    /// Encodes these parameters as a block option value.
    pub fn to_option_value(&self) -> Box<[u8]> {
        encode_var_uint(self.num << 4 | u32::from(self.more) << 3 | u32::from(self.size_exponent))
    }

    /// Decodes a block option value.
    ///
    /// # Errors
    ///
    /// Will return [`OptionValueError::TooLong`] if the value is longer than three bytes and
    /// [`OptionValueError::InvalidBlockSizeExponent`] for the reserved exponent 7.
    pub fn from_option_value(value: &[u8]) -> Result<BlockParams, OptionValueError> {
        if value.len() > CoapOptionType::Block2.max_len() {
            return Err(OptionValueError::TooLong);
        }
        let raw = decode_var_uint(value)?;
        BlockParams::new(raw >> 4, raw & 0x08 != 0, (raw & 0x07) as u8)
    }
}

/// Encodes `val` as a variable length unsigned integer option value, i.e., in network byte order
/// with all leading zero bytes removed. Zero is encoded as an empty value.
pub fn encode_var_uint(val: u32) -> Box<[u8]> {
    let bytes_to_discard = (val.leading_zeros() / 8) as usize;
    val.to_be_bytes()[bytes_to_discard..].into()
}

/// Decodes a variable length unsigned integer option value.
///
/// # Errors
///
/// Will return [`OptionValueError::TooLong`] if `val` is longer than four bytes.
pub fn decode_var_uint(val: &[u8]) -> Result<u32, OptionValueError> {
    if val.len() > 4 {
        return Err(OptionValueError::TooLong);
    }
    Ok(val.iter().fold(0u32, |acc, b| acc << 8 | u32::from(*b)))
}
