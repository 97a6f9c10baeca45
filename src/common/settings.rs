// src/common/settings.rs

//! Sensor settings frames (`xTU`, `xRU`, `xSU`) and their feature bitmasks.
//!
//! A settings frame carries an `R` field of the form
//! `<requested>&<composite>`, two strings of eight `0`/`1` digits. Digit `n`
//! of each string belongs to the `n`th label of the kind's fixed field order;
//! unused trailing slots are zero. Packing and unpacking must use the same
//! order or the bits change meaning.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use arrayvec::ArrayString;

use super::error::CodecError;
use super::fields::split_token;

/// Bit slots reserved in each mask regardless of how many a kind uses.
pub const MASK_WIDTH: usize = 8;

/// Label of the packed bitmask field.
pub const MASK_LABEL: &str = "R";

pub const PTU_ORDER: [&str; 4] = ["Pa", "Ta", "Tp", "Ua"];
pub const PRECIPITATION_ORDER: [&str; 8] = ["Rc", "Rd", "Ri", "Hc", "Hd", "Hi", "Rp", "Hp"];
pub const SUPERVISOR_ORDER: [&str; 5] = ["Th", "Vh", "Vs", "Vr", "Id"];

/// Undocumented reserved fields the supervisor reports but must not be sent back.
pub const SUPERVISOR_IGNORED: [&str; 10] = ["a", "b", "c", "d", "e", "f", "g", "h", "j", "k"];

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SettingsKind {
    /// Pressure, temperature and humidity sensor (`xTU`).
    Ptu,
    /// Precipitation sensor (`xRU`).
    Precipitation,
    /// Supervisor: heating and voltages (`xSU`).
    Supervisor,
}

impl SettingsKind {
    pub const ALL: [SettingsKind; 3] =
        [SettingsKind::Ptu, SettingsKind::Precipitation, SettingsKind::Supervisor];

    pub const fn tag(&self) -> &'static str {
        match self {
            SettingsKind::Ptu => "xTU",
            SettingsKind::Precipitation => "xRU",
            SettingsKind::Supervisor => "xSU",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.tag() == tag)
    }

    /// Bit order of the `R` field. Never changes at runtime.
    pub const fn field_order(&self) -> &'static [&'static str] {
        match self {
            SettingsKind::Ptu => &PTU_ORDER,
            SettingsKind::Precipitation => &PRECIPITATION_ORDER,
            SettingsKind::Supervisor => &SUPERVISOR_ORDER,
        }
    }

    /// Labels dropped when settings are written back.
    pub const fn ignored_labels(&self) -> &'static [&'static str] {
        match self {
            SettingsKind::Supervisor => &SUPERVISOR_IGNORED,
            _ => &[],
        }
    }

    fn position(&self, label: &str) -> Result<usize, CodecError> {
        self.field_order().iter().position(|l| *l == label).ok_or_else(|| {
            CodecError::InvalidParameter {
                field: "label",
                value: String::from(label),
                accepted: format!("{:?}", self.field_order()),
            }
        })
    }
}

// --- Bitmask packing ---

/// Renders flags as `1`/`0` digits, right-padded with `0` to [`MASK_WIDTH`].
pub fn pack_mask(flags: &[bool]) -> Result<ArrayString<MASK_WIDTH>, CodecError> {
    if flags.len() > MASK_WIDTH {
        return Err(CodecError::InvalidParameter {
            field: "flags",
            value: format!("{} positions", flags.len()),
            accepted: format!("at most {} positions", MASK_WIDTH),
        });
    }
    let mut out = ArrayString::new();
    for &flag in flags {
        out.push(if flag { '1' } else { '0' });
    }
    while !out.is_full() {
        out.push('0');
    }
    Ok(out)
}

/// Reads the first `len` digits of a mask string.
///
/// Every digit, padding included, must be `0` or `1`, and the string must
/// cover at least `len` positions.
pub fn unpack_mask(digits: &str, len: usize) -> Result<Vec<bool>, CodecError> {
    if digits.len() < len || !digits.bytes().all(|b| b == b'0' || b == b'1') {
        return Err(CodecError::malformed(digits));
    }
    Ok(digits.bytes().take(len).map(|b| b == b'1').collect())
}

/// Maps enabled labels onto positional flags over `order`.
pub fn flags_for_labels(order: &[&str], enabled: &[&str]) -> Vec<bool> {
    order.iter().map(|label| enabled.contains(label)).collect()
}

// --- SettingsBlock ---

/// Requested and composite flags of one settings kind, positional over
/// [`SettingsKind::field_order`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawSettingsBlock"))]
pub struct SettingsBlock {
    kind: SettingsKind,
    requested: Vec<bool>,
    composite: Vec<bool>,
}

impl SettingsBlock {
    /// All fields disabled.
    pub fn new(kind: SettingsKind) -> Self {
        let len = kind.field_order().len();
        SettingsBlock { kind, requested: alloc::vec![false; len], composite: alloc::vec![false; len] }
    }

    /// Builds a block from positional flags. Missing trailing positions are
    /// false; extra positions are rejected.
    pub fn from_flags(kind: SettingsKind, requested: &[bool], composite: &[bool]) -> Result<Self, CodecError> {
        let mut block = Self::new(kind);
        let len = block.requested.len();
        for (name, flags) in [("requested", requested), ("composite", composite)] {
            if flags.len() > len {
                return Err(CodecError::InvalidParameter {
                    field: name,
                    value: format!("{} positions", flags.len()),
                    accepted: format!("at most {} positions", len),
                });
            }
        }
        block.requested[..requested.len()].copy_from_slice(requested);
        block.composite[..composite.len()].copy_from_slice(composite);
        Ok(block)
    }

    /// Builds a block from flags that cover the kind's field order exactly.
    pub fn from_exact_flags(kind: SettingsKind, requested: &[bool], composite: &[bool]) -> Result<Self, CodecError> {
        let len = kind.field_order().len();
        for (name, flags) in [("requested", requested), ("composite", composite)] {
            if flags.len() != len {
                return Err(CodecError::InvalidParameter {
                    field: name,
                    value: format!("{} positions", flags.len()),
                    accepted: format!("exactly {} positions", len),
                });
            }
        }
        Self::from_flags(kind, requested, composite)
    }

    /// Builds a block with the named labels enabled.
    pub fn from_labels(kind: SettingsKind, requested: &[&str], composite: &[&str]) -> Result<Self, CodecError> {
        let mut block = Self::new(kind);
        for label in requested {
            block.set_requested(label, true)?;
        }
        for label in composite {
            block.set_composite(label, true)?;
        }
        Ok(block)
    }

    pub fn kind(&self) -> SettingsKind {
        self.kind
    }

    pub fn requested_flags(&self) -> &[bool] {
        &self.requested
    }

    pub fn composite_flags(&self) -> &[bool] {
        &self.composite
    }

    pub fn is_requested(&self, label: &str) -> Option<bool> {
        self.kind.position(label).ok().map(|i| self.requested[i])
    }

    pub fn is_composite(&self, label: &str) -> Option<bool> {
        self.kind.position(label).ok().map(|i| self.composite[i])
    }

    pub fn set_requested(&mut self, label: &str, enabled: bool) -> Result<(), CodecError> {
        let i = self.kind.position(label)?;
        self.requested[i] = enabled;
        Ok(())
    }

    pub fn set_composite(&mut self, label: &str, enabled: bool) -> Result<(), CodecError> {
        let i = self.kind.position(label)?;
        self.composite[i] = enabled;
        Ok(())
    }

    /// Packs both masks as `requested&composite`.
    pub fn encode(&self) -> Result<String, CodecError> {
        let requested = pack_mask(&self.requested)?;
        let composite = pack_mask(&self.composite)?;
        Ok(format!("{}&{}", requested, composite))
    }

    /// Unpacks an `R` field value for `kind`.
    pub fn decode(kind: SettingsKind, value: &str) -> Result<Self, CodecError> {
        let (requested, composite) = value.split_once('&').ok_or_else(|| CodecError::malformed(value))?;
        let len = kind.field_order().len();
        Ok(SettingsBlock {
            kind,
            requested: unpack_mask(requested, len)?,
            composite: unpack_mask(composite, len)?,
        })
    }
}

// --- Settings ---

/// A complete settings frame: the packed flags plus plain fields such as the
/// update interval or unit selectors.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawSettings"))]
pub struct Settings {
    block: SettingsBlock,
    fields: Vec<(String, String)>,
}

impl Settings {
    pub fn new(kind: SettingsKind) -> Self {
        Settings { block: SettingsBlock::new(kind), fields: Vec::new() }
    }

    pub fn with_block(block: SettingsBlock) -> Self {
        Settings { block, fields: Vec::new() }
    }

    /// Decodes the tokens following a settings tag. The `R` field is required.
    pub fn decode(kind: SettingsKind, tokens: &[&str]) -> Result<Self, CodecError> {
        let mut block = None;
        let mut settings = Settings::new(kind);
        for token in tokens {
            let (label, value) = split_token(token)?;
            if label == MASK_LABEL {
                block = Some(SettingsBlock::decode(kind, value)?);
            } else {
                settings.put(label, value);
            }
        }
        settings.block = block.ok_or_else(|| CodecError::MalformedField(String::from(MASK_LABEL)))?;
        Ok(settings)
    }

    pub fn kind(&self) -> SettingsKind {
        self.block.kind()
    }

    pub fn block(&self) -> &SettingsBlock {
        &self.block
    }

    pub fn block_mut(&mut self) -> &mut SettingsBlock {
        &mut self.block
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.fields.iter().find(|(l, _)| l == label).map(|(_, v)| v.as_str())
    }

    /// Sets a plain field, keeping its position if it already exists.
    pub fn set(&mut self, label: &str, value: &str) -> Result<(), CodecError> {
        if label.is_empty() || label == MASK_LABEL || label.contains(&[',', '='][..]) {
            return Err(CodecError::InvalidParameter {
                field: "label",
                value: String::from(label),
                accepted: String::from("a plain field label other than R"),
            });
        }
        if value.contains(&[',', '='][..]) {
            return Err(CodecError::InvalidParameter {
                field: "value",
                value: String::from(value),
                accepted: String::from("text without ',' or '='"),
            });
        }
        self.put(label, value);
        Ok(())
    }

    pub fn remove(&mut self, label: &str) -> Option<String> {
        let i = self.fields.iter().position(|(l, _)| l == label)?;
        Some(self.fields.remove(i).1)
    }

    /// Plain fields in stored order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(l, v)| (l.as_str(), v.as_str()))
    }

    /// Renders the settings payload: `R` first, then the plain fields, minus
    /// the kind's ignore-list.
    pub fn encode_payload(&self) -> Result<String, CodecError> {
        let ignored = self.kind().ignored_labels();
        let mut parts = Vec::with_capacity(self.fields.len() + 1);
        parts.push(format!("{}={}", MASK_LABEL, self.block.encode()?));
        for (label, value) in self.fields() {
            if ignored.contains(&label) {
                continue;
            }
            parts.push(format!("{}={}", label, value));
        }
        Ok(parts.join(","))
    }

    fn put(&mut self, label: &str, value: &str) {
        match self.fields.iter_mut().find(|(l, _)| l == label) {
            Some(entry) => entry.1 = String::from(value),
            None => self.fields.push((String::from(label), String::from(value))),
        }
    }
}

// --- Deserialization ---

// Deserialized input goes through the same checks as the constructors.

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawSettingsBlock {
    kind: SettingsKind,
    requested: Vec<bool>,
    composite: Vec<bool>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawSettingsBlock> for SettingsBlock {
    type Error = CodecError;

    fn try_from(raw: RawSettingsBlock) -> Result<Self, Self::Error> {
        SettingsBlock::from_exact_flags(raw.kind, &raw.requested, &raw.composite)
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawSettings {
    block: SettingsBlock,
    fields: Vec<(String, String)>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawSettings> for Settings {
    type Error = CodecError;

    fn try_from(raw: RawSettings) -> Result<Self, Self::Error> {
        let mut settings = Settings::with_block(raw.block);
        for (label, value) in &raw.fields {
            settings.set(label, value)?;
        }
        Ok(settings)
    }
}
