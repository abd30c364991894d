//! Type algebra (SPEC_FULL §3.1, §4.2).
//!
//! A type value is three disjoint bitsets — base, storage/qualifier,
//! attribute — each addressed by its own fieldless enum. `Bit` wraps one
//! variant from exactly one of those enums, so the partition a bit belongs to
//! is always recoverable from the `Bit` itself (§3.1 invariant i), even
//! though the aggregate `TypeValue` stores each partition in its own
//! tag-free `u64`/`u32` field for cheap combining.

use crate::dialect::{Dialect, DialectSet};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Partition {
    Base,
    Storage,
    Attribute,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum BaseBit {
    Void = 0,
    AutoPlaceholder,
    Bool,
    Char,
    Char8T,
    Char16T,
    Char32T,
    WChar,
    Short,
    Int,
    Long,
    LongLong,
    Signed,
    Unsigned,
    Float,
    Double,
    Complex,
    Imaginary,
    Enum,
    Struct,
    Union,
    Class,
    Namespace,
    Scope,
    TypedefOpaque,
    Accum,
    Fract,
    Sat,
}

impl BaseBit {
    pub const ALL: [BaseBit; 28] = [
        BaseBit::Void,
        BaseBit::AutoPlaceholder,
        BaseBit::Bool,
        BaseBit::Char,
        BaseBit::Char8T,
        BaseBit::Char16T,
        BaseBit::Char32T,
        BaseBit::WChar,
        BaseBit::Short,
        BaseBit::Int,
        BaseBit::Long,
        BaseBit::LongLong,
        BaseBit::Signed,
        BaseBit::Unsigned,
        BaseBit::Float,
        BaseBit::Double,
        BaseBit::Complex,
        BaseBit::Imaginary,
        BaseBit::Enum,
        BaseBit::Struct,
        BaseBit::Union,
        BaseBit::Class,
        BaseBit::Namespace,
        BaseBit::Scope,
        BaseBit::TypedefOpaque,
        BaseBit::Accum,
        BaseBit::Fract,
        BaseBit::Sat,
    ];

    fn index(self) -> u32 {
        self as u8 as u32
    }

    pub fn english(self) -> &'static str {
        match self {
            BaseBit::Void => "void",
            BaseBit::AutoPlaceholder => "auto",
            BaseBit::Bool => "boolean",
            BaseBit::Char => "character",
            BaseBit::Char8T => "8-bit character",
            BaseBit::Char16T => "16-bit character",
            BaseBit::Char32T => "32-bit character",
            BaseBit::WChar => "wide character",
            BaseBit::Short => "short",
            BaseBit::Int => "integer",
            BaseBit::Long => "long",
            BaseBit::LongLong => "long long",
            BaseBit::Signed => "signed",
            BaseBit::Unsigned => "unsigned",
            BaseBit::Float => "floating point",
            BaseBit::Double => "double precision floating point",
            BaseBit::Complex => "complex",
            BaseBit::Imaginary => "imaginary",
            BaseBit::Enum => "enumeration",
            BaseBit::Struct => "structure",
            BaseBit::Union => "union",
            BaseBit::Class => "class",
            BaseBit::Namespace => "namespace",
            BaseBit::Scope => "scope",
            BaseBit::TypedefOpaque => "type",
            BaseBit::Accum => "accum",
            BaseBit::Fract => "fract",
            BaseBit::Sat => "saturating",
        }
    }

    pub fn native(self) -> &'static str {
        match self {
            BaseBit::Void => "void",
            BaseBit::AutoPlaceholder => "auto",
            BaseBit::Bool => "bool",
            BaseBit::Char => "char",
            BaseBit::Char8T => "char8_t",
            BaseBit::Char16T => "char16_t",
            BaseBit::Char32T => "char32_t",
            BaseBit::WChar => "wchar_t",
            BaseBit::Short => "short",
            BaseBit::Int => "int",
            BaseBit::Long => "long",
            BaseBit::LongLong => "long long",
            BaseBit::Signed => "signed",
            BaseBit::Unsigned => "unsigned",
            BaseBit::Float => "float",
            BaseBit::Double => "double",
            BaseBit::Complex => "_Complex",
            BaseBit::Imaginary => "_Imaginary",
            BaseBit::Enum => "enum",
            BaseBit::Struct => "struct",
            BaseBit::Union => "union",
            BaseBit::Class => "class",
            BaseBit::Namespace => "namespace",
            BaseBit::Scope => "scope",
            BaseBit::TypedefOpaque => "",
            BaseBit::Accum => "_Accum",
            BaseBit::Fract => "_Fract",
            BaseBit::Sat => "_Sat",
        }
    }

    /// Canonical rendering order: modifiers before the noun they modify.
    fn order(self) -> u32 {
        match self {
            BaseBit::Signed | BaseBit::Unsigned => 0,
            BaseBit::Short | BaseBit::Long | BaseBit::LongLong => 1,
            BaseBit::Complex | BaseBit::Imaginary => 2,
            BaseBit::Sat => 3,
            _ => 4,
        }
    }

    /// Dialect set in which this base bit is itself meaningful.
    fn dialects(self) -> DialectSet {
        match self {
            BaseBit::Char8T => Dialect::Cpp20.min().union(Dialect::C2x.min()),
            BaseBit::Char16T | BaseBit::Char32T => {
                Dialect::Cpp11.min().union(Dialect::C11.min())
            }
            BaseBit::WChar => Dialect::Cpp98.min().union(Dialect::C95.min()),
            BaseBit::Bool => Dialect::Cpp98.min().union(Dialect::C99.min()),
            BaseBit::AutoPlaceholder => Dialect::Cpp11.min(),
            BaseBit::LongLong => Dialect::C99.min().union(Dialect::Cpp11.min()),
            BaseBit::Complex | BaseBit::Imaginary => Dialect::C99.min(),
            BaseBit::Accum | BaseBit::Fract | BaseBit::Sat => DialectSet::c_any(),
            BaseBit::Class => DialectSet::cpp_any(),
            _ => DialectSet::any(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StorageBit {
    AutoStorage = 0,
    AppleBlock,
    Extern,
    ExternC,
    Register,
    Static,
    ThreadLocal,
    Typedef,
    Consteval,
    Constexpr,
    Constinit,
    Default,
    Delete,
    Explicit,
    Export,
    Final,
    Friend,
    Inline,
    Mutable,
    Noexcept,
    Override,
    Throw,
    Virtual,
    PureVirtual,
    Const,
    Volatile,
    Restrict,
    Atomic,
    RefQualifier,
    RvalueRefQualifier,
    UpcShared,
    UpcStrict,
    UpcRelaxed,
}

impl StorageBit {
    pub const ALL: [StorageBit; 33] = [
        StorageBit::AutoStorage,
        StorageBit::AppleBlock,
        StorageBit::Extern,
        StorageBit::ExternC,
        StorageBit::Register,
        StorageBit::Static,
        StorageBit::ThreadLocal,
        StorageBit::Typedef,
        StorageBit::Consteval,
        StorageBit::Constexpr,
        StorageBit::Constinit,
        StorageBit::Default,
        StorageBit::Delete,
        StorageBit::Explicit,
        StorageBit::Export,
        StorageBit::Final,
        StorageBit::Friend,
        StorageBit::Inline,
        StorageBit::Mutable,
        StorageBit::Noexcept,
        StorageBit::Override,
        StorageBit::Throw,
        StorageBit::Virtual,
        StorageBit::PureVirtual,
        StorageBit::Const,
        StorageBit::Volatile,
        StorageBit::Restrict,
        StorageBit::Atomic,
        StorageBit::RefQualifier,
        StorageBit::RvalueRefQualifier,
        StorageBit::UpcShared,
        StorageBit::UpcStrict,
        StorageBit::UpcRelaxed,
    ];

    fn index(self) -> u32 {
        self as u8 as u32
    }

    pub fn english(self) -> &'static str {
        match self {
            StorageBit::AutoStorage => "automatic",
            StorageBit::AppleBlock => "block",
            StorageBit::Extern => "external",
            StorageBit::ExternC => "external \"C\"",
            StorageBit::Register => "register",
            StorageBit::Static => "static",
            StorageBit::ThreadLocal => "thread-local",
            StorageBit::Typedef => "type",
            StorageBit::Consteval => "consteval",
            StorageBit::Constexpr => "constant expression",
            StorageBit::Constinit => "constinit",
            StorageBit::Default => "default",
            StorageBit::Delete => "deleted",
            StorageBit::Explicit => "explicit",
            StorageBit::Export => "export",
            StorageBit::Final => "final",
            StorageBit::Friend => "friend",
            StorageBit::Inline => "inline",
            StorageBit::Mutable => "mutable",
            StorageBit::Noexcept => "non-throwing",
            StorageBit::Override => "override",
            StorageBit::Throw => "throwing",
            StorageBit::Virtual => "virtual",
            StorageBit::PureVirtual => "pure virtual",
            StorageBit::Const => "const",
            StorageBit::Volatile => "volatile",
            StorageBit::Restrict => "restrict",
            StorageBit::Atomic => "atomic",
            StorageBit::RefQualifier => "reference",
            StorageBit::RvalueRefQualifier => "rvalue reference",
            StorageBit::UpcShared => "shared",
            StorageBit::UpcStrict => "strict",
            StorageBit::UpcRelaxed => "relaxed",
        }
    }

    pub fn native(self) -> &'static str {
        match self {
            StorageBit::AutoStorage => "auto",
            StorageBit::AppleBlock => "__block",
            StorageBit::Extern => "extern",
            StorageBit::ExternC => "extern \"C\"",
            StorageBit::Register => "register",
            StorageBit::Static => "static",
            StorageBit::ThreadLocal => "thread_local",
            StorageBit::Typedef => "typedef",
            StorageBit::Consteval => "consteval",
            StorageBit::Constexpr => "constexpr",
            StorageBit::Constinit => "constinit",
            StorageBit::Default => "= default",
            StorageBit::Delete => "= delete",
            StorageBit::Explicit => "explicit",
            StorageBit::Export => "export",
            StorageBit::Final => "final",
            StorageBit::Friend => "friend",
            StorageBit::Inline => "inline",
            StorageBit::Mutable => "mutable",
            StorageBit::Noexcept => "noexcept",
            StorageBit::Override => "override",
            StorageBit::Throw => "throw()",
            StorageBit::Virtual => "virtual",
            StorageBit::PureVirtual => "= 0",
            StorageBit::Const => "const",
            StorageBit::Volatile => "volatile",
            StorageBit::Restrict => "restrict",
            StorageBit::Atomic => "_Atomic",
            StorageBit::RefQualifier => "&",
            StorageBit::RvalueRefQualifier => "&&",
            StorageBit::UpcShared => "shared",
            StorageBit::UpcStrict => "strict",
            StorageBit::UpcRelaxed => "relaxed",
        }
    }

    /// Canonical rendering order: storage class, then qualifiers, then the
    /// rest (§4.2 "storage class before qualifiers before base").
    fn order(self) -> u32 {
        match self {
            StorageBit::Friend
            | StorageBit::Typedef
            | StorageBit::Extern
            | StorageBit::ExternC
            | StorageBit::Static
            | StorageBit::AutoStorage
            | StorageBit::Register
            | StorageBit::ThreadLocal => 0,
            StorageBit::Consteval | StorageBit::Constexpr | StorageBit::Constinit => 1,
            StorageBit::Virtual | StorageBit::Explicit | StorageBit::Inline => 2,
            StorageBit::Const | StorageBit::Volatile | StorageBit::Restrict | StorageBit::Atomic => 3,
            _ => 4,
        }
    }

    fn dialects(self) -> DialectSet {
        match self {
            StorageBit::ThreadLocal => Dialect::Cpp11.min().union(Dialect::C11.min()),
            StorageBit::Consteval | StorageBit::Constinit => Dialect::Cpp20.min(),
            StorageBit::Constexpr => Dialect::Cpp11.min(),
            StorageBit::Default | StorageBit::Delete | StorageBit::Final | StorageBit::Override => {
                Dialect::Cpp11.min()
            }
            StorageBit::Noexcept => Dialect::Cpp11.min(),
            StorageBit::RefQualifier | StorageBit::RvalueRefQualifier => Dialect::Cpp11.min(),
            StorageBit::ExternC => DialectSet::any(),
            StorageBit::Atomic => Dialect::C11.min(),
            StorageBit::UpcShared | StorageBit::UpcStrict | StorageBit::UpcRelaxed => DialectSet::c_any(),
            StorageBit::AppleBlock => DialectSet::any(),
            StorageBit::Virtual
            | StorageBit::Explicit
            | StorageBit::Friend
            | StorageBit::Mutable
            | StorageBit::Export => DialectSet::cpp_any(),
            StorageBit::Throw => DialectSet::cpp_any(),
            _ => DialectSet::any(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum AttributeBit {
    CarriesDependency = 0,
    Deprecated,
    MaybeUnused,
    Nodiscard,
    Noreturn,
    NoUniqueAddress,
    CdeclCc,
    StdcallCc,
    FastcallCc,
    ThiscallCc,
    VectorcallCc,
}

impl AttributeBit {
    pub const ALL: [AttributeBit; 11] = [
        AttributeBit::CarriesDependency,
        AttributeBit::Deprecated,
        AttributeBit::MaybeUnused,
        AttributeBit::Nodiscard,
        AttributeBit::Noreturn,
        AttributeBit::NoUniqueAddress,
        AttributeBit::CdeclCc,
        AttributeBit::StdcallCc,
        AttributeBit::FastcallCc,
        AttributeBit::ThiscallCc,
        AttributeBit::VectorcallCc,
    ];

    fn index(self) -> u32 {
        self as u8 as u32
    }

    pub fn is_calling_convention(self) -> bool {
        matches!(
            self,
            AttributeBit::CdeclCc
                | AttributeBit::StdcallCc
                | AttributeBit::FastcallCc
                | AttributeBit::ThiscallCc
                | AttributeBit::VectorcallCc
        )
    }

    pub fn english(self) -> &'static str {
        match self {
            AttributeBit::CarriesDependency => "carries dependency",
            AttributeBit::Deprecated => "deprecated",
            AttributeBit::MaybeUnused => "maybe unused",
            AttributeBit::Nodiscard => "non-discardable",
            AttributeBit::Noreturn => "non-returning",
            AttributeBit::NoUniqueAddress => "no unique address",
            AttributeBit::CdeclCc => "cdecl",
            AttributeBit::StdcallCc => "stdcall",
            AttributeBit::FastcallCc => "fastcall",
            AttributeBit::ThiscallCc => "thiscall",
            AttributeBit::VectorcallCc => "vectorcall",
        }
    }

    pub fn native(self) -> &'static str {
        match self {
            AttributeBit::CarriesDependency => "carries_dependency",
            AttributeBit::Deprecated => "deprecated",
            AttributeBit::MaybeUnused => "maybe_unused",
            AttributeBit::Nodiscard => "nodiscard",
            AttributeBit::Noreturn => "noreturn",
            AttributeBit::NoUniqueAddress => "no_unique_address",
            AttributeBit::CdeclCc => "__cdecl",
            AttributeBit::StdcallCc => "__stdcall",
            AttributeBit::FastcallCc => "__fastcall",
            AttributeBit::ThiscallCc => "__thiscall",
            AttributeBit::VectorcallCc => "__vectorcall",
        }
    }

    fn dialects(self) -> DialectSet {
        match self {
            AttributeBit::CarriesDependency
            | AttributeBit::Deprecated
            | AttributeBit::MaybeUnused
            | AttributeBit::Nodiscard
            | AttributeBit::Noreturn => Dialect::Cpp11.min().union(Dialect::C2x.min()),
            AttributeBit::NoUniqueAddress => Dialect::Cpp20.min(),
            _ => DialectSet::any(),
        }
    }
}

/// A single bit identifier, tagged with the partition it belongs to so the
/// partition is always recoverable from the value alone (§3.1 invariant i).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bit {
    Base(BaseBit),
    Storage(StorageBit),
    Attribute(AttributeBit),
}

impl Bit {
    pub fn partition(self) -> Partition {
        match self {
            Bit::Base(_) => Partition::Base,
            Bit::Storage(_) => Partition::Storage,
            Bit::Attribute(_) => Partition::Attribute,
        }
    }

    /// Dialect set in which this bit is itself meaningful, independent of
    /// any pairing with other bits (§4.5 identifier-classification point 2:
    /// a keyword not yet introduced in the active dialect is an identifier).
    pub fn dialects(self) -> DialectSet {
        match self {
            Bit::Base(b) => b.dialects(),
            Bit::Storage(s) => s.dialects(),
            Bit::Attribute(a) => a.dialects(),
        }
    }

    pub fn english(self) -> &'static str {
        match self {
            Bit::Base(b) => b.english(),
            Bit::Storage(s) => s.english(),
            Bit::Attribute(a) => a.english(),
        }
    }

    pub fn native(self) -> &'static str {
        match self {
            Bit::Base(b) => b.native(),
            Bit::Storage(s) => s.native(),
            Bit::Attribute(a) => a.native(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Form {
    English,
    Native,
}

/// A type value: three disjoint bitsets, one per partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct TypeValue {
    base: u64,
    storage: u64,
    attribute: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddError {
    /// The exact same bit was already set (and isn't the long+long→long long
    /// special case from §4.2).
    ConflictingSpecifier(Bit),
}

impl TypeValue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has(self, bit: Bit) -> bool {
        match bit {
            Bit::Base(b) => self.base & (1 << b.index()) != 0,
            Bit::Storage(s) => self.storage & (1 << s.index()) != 0,
            Bit::Attribute(a) => self.attribute & (1 << a.index()) != 0,
        }
    }

    fn raw_set(&mut self, bit: Bit) {
        match bit {
            Bit::Base(b) => self.base |= 1 << b.index(),
            Bit::Storage(s) => self.storage |= 1 << s.index(),
            Bit::Attribute(a) => self.attribute |= 1 << a.index(),
        }
    }

    fn raw_clear(&mut self, bit: Bit) {
        match bit {
            Bit::Base(b) => self.base &= !(1 << b.index()),
            Bit::Storage(s) => self.storage &= !(1 << s.index()),
            Bit::Attribute(a) => self.attribute &= !(1 << a.index()),
        }
    }

    /// §4.2 `add`: inserts `bit`, failing with `conflicting type specifier`
    /// if already set — except two `long` bits (with no float/double present)
    /// combine into `long long`.
    pub fn add(&mut self, bit: Bit) -> Result<(), AddError> {
        if bit == Bit::Base(BaseBit::Long) && self.has(Bit::Base(BaseBit::Long)) {
            let has_float = self.has(Bit::Base(BaseBit::Float)) || self.has(Bit::Base(BaseBit::Double));
            if !has_float {
                self.raw_clear(Bit::Base(BaseBit::Long));
                self.raw_set(Bit::Base(BaseBit::LongLong));
                return Ok(());
            }
            return Err(AddError::ConflictingSpecifier(bit));
        }
        if self.has(bit) {
            return Err(AddError::ConflictingSpecifier(bit));
        }
        self.raw_set(bit);
        Ok(())
    }

    pub fn union(self, other: TypeValue) -> TypeValue {
        TypeValue {
            base: self.base | other.base,
            storage: self.storage | other.storage,
            attribute: self.attribute | other.attribute,
        }
    }

    pub fn intersect(self, other: TypeValue) -> TypeValue {
        TypeValue {
            base: self.base & other.base,
            storage: self.storage & other.storage,
            attribute: self.attribute & other.attribute,
        }
    }

    pub fn diff(self, other: TypeValue) -> TypeValue {
        TypeValue {
            base: self.base & !other.base,
            storage: self.storage & !other.storage,
            attribute: self.attribute & !other.attribute,
        }
    }

    pub fn base_bits(self) -> impl Iterator<Item = BaseBit> {
        BaseBit::ALL.into_iter().filter(move |&b| self.has(Bit::Base(b)))
    }

    pub fn storage_bits(self) -> impl Iterator<Item = StorageBit> {
        StorageBit::ALL
            .into_iter()
            .filter(move |&b| self.has(Bit::Storage(b)))
    }

    pub fn attribute_bits(self) -> impl Iterator<Item = AttributeBit> {
        AttributeBit::ALL
            .into_iter()
            .filter(move |&b| self.has(Bit::Attribute(b)))
    }

    pub fn is_empty(self) -> bool {
        self.base == 0 && self.storage == 0 && self.attribute == 0
    }

    pub fn has_only_modifiers(self) -> bool {
        let noun_bits: u64 = (1 << BaseBit::Void.index())
            | (1 << BaseBit::AutoPlaceholder.index())
            | (1 << BaseBit::Bool.index())
            | (1 << BaseBit::Char.index())
            | (1 << BaseBit::Char8T.index())
            | (1 << BaseBit::Char16T.index())
            | (1 << BaseBit::Char32T.index())
            | (1 << BaseBit::WChar.index())
            | (1 << BaseBit::Float.index())
            | (1 << BaseBit::Double.index())
            | (1 << BaseBit::Enum.index())
            | (1 << BaseBit::Struct.index())
            | (1 << BaseBit::Union.index())
            | (1 << BaseBit::Class.index())
            | (1 << BaseBit::Namespace.index())
            | (1 << BaseBit::Scope.index())
            | (1 << BaseBit::TypedefOpaque.index());
        self.base != 0 && self.base & noun_bits == 0
    }

    /// §4.2 `normalize`: drop redundant `signed` (except on `char`, where it
    /// disambiguates from plain/unsigned `char`).
    pub fn normalize(self) -> TypeValue {
        let mut v = self;
        if v.has(Bit::Base(BaseBit::Signed)) && !v.has(Bit::Base(BaseBit::Char)) {
            v.raw_clear(Bit::Base(BaseBit::Signed));
        }
        v
    }

    /// §4.2 `check`: the dialect set in which `self` is legal. `ANY` when
    /// every constraint passes.
    pub fn check(self, dialect: Dialect) -> DialectSet {
        for bit in self.all_bits() {
            let allowed = bit.dialects();
            if !allowed.contains(dialect) {
                return allowed;
            }
        }
        for (a, b) in self.all_bits_pairs() {
            let cell = pair_legality(a, b);
            if !cell.contains(dialect) {
                return cell;
            }
        }
        DialectSet::any()
    }

    fn all_bits(self) -> Vec<Bit> {
        let mut v: Vec<Bit> = self.base_bits().map(Bit::Base).collect();
        v.extend(self.storage_bits().map(Bit::Storage));
        v.extend(self.attribute_bits().map(Bit::Attribute));
        v
    }

    fn all_bits_pairs(self) -> Vec<(Bit, Bit)> {
        let bits = self.all_bits();
        let mut pairs = Vec::new();
        for i in 0..bits.len() {
            for j in (i + 1)..bits.len() {
                pairs.push((bits[i], bits[j]));
            }
        }
        pairs
    }

    /// §4.2 `name`: render in canonical bit order.
    pub fn name(self, form: Form) -> String {
        let v = self.normalize();
        let mut storage: Vec<StorageBit> = v.storage_bits().collect();
        storage.sort_by_key(|b| b.order());
        let mut base: Vec<BaseBit> = v.base_bits().collect();
        base.sort_by_key(|b| b.order());
        let mut attrs: Vec<AttributeBit> = v.attribute_bits().collect();
        attrs.sort_by_key(|a| a.index());

        let mut words: Vec<String> = Vec::new();
        match form {
            Form::English => {
                for a in &attrs {
                    words.push(a.english().to_string());
                }
                for s in &storage {
                    words.push(s.english().to_string());
                }
                for b in &base {
                    words.push(b.english().to_string());
                }
                if base.is_empty() && v.has_only_modifiers() {
                    words.push("integer".to_string());
                } else if base.is_empty() && !storage.is_empty() {
                    // A bare storage-class-only type defaults to `int` in English too.
                    words.push("integer".to_string());
                }
            }
            Form::Native => {
                if attrs
                    .iter()
                    .any(|a| !a.is_calling_convention())
                {
                    let names: Vec<&str> = attrs
                        .iter()
                        .filter(|a| !a.is_calling_convention())
                        .map(|a| a.native())
                        .collect();
                    words.push(format!("[[{}]]", names.join(", ")));
                }
                for s in &storage {
                    words.push(s.native().to_string());
                }
                for a in attrs.iter().filter(|a| a.is_calling_convention()) {
                    words.push(a.native().to_string());
                }
                for b in &base {
                    if b.native().is_empty() {
                        continue;
                    }
                    words.push(b.native().to_string());
                }
                if base.is_empty() && v.has_only_modifiers() {
                    // implicit int suppressed in native rendering, per §4.2.
                }
            }
        }
        words.retain(|w| !w.is_empty());
        words.join(" ")
    }
}

impl fmt::Display for TypeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name(Form::Native))
    }
}

/// §3.1 legality table lookup. Matrices are conceptually lower-triangular and
/// symmetric in meaning (§8 invariant 4); `pair_legality` normalises the
/// index order before consulting the rules below so callers never need to
/// worry about which operand came first.
fn pair_legality(a: Bit, b: Bit) -> DialectSet {
    use Bit::*;
    let (a, b) = order_pair(a, b);
    match (a, b) {
        // Two `long`s are handled in `add`, never reach here as a stored pair.
        (Base(BaseBit::Long), Base(BaseBit::LongLong)) => DialectSet::NONE,
        (Base(BaseBit::Short), Base(BaseBit::Long)) => DialectSet::NONE,
        (Base(BaseBit::Short), Base(BaseBit::LongLong)) => DialectSet::NONE,
        (Base(BaseBit::Signed), Base(BaseBit::Unsigned)) => DialectSet::NONE,
        (Base(BaseBit::Signed), Base(BaseBit::Bool)) => DialectSet::NONE,
        (Base(BaseBit::Unsigned), Base(BaseBit::Bool)) => DialectSet::NONE,
        (Base(BaseBit::Short), Base(BaseBit::Bool)) => DialectSet::NONE,
        (Base(BaseBit::Long), Base(BaseBit::Bool)) => DialectSet::NONE,
        (Base(BaseBit::Short), Base(BaseBit::Float)) => DialectSet::NONE,
        (Base(BaseBit::Long), Base(BaseBit::Float)) => DialectSet::NONE,
        (Base(BaseBit::Signed), Base(BaseBit::Float)) => DialectSet::NONE,
        (Base(BaseBit::Unsigned), Base(BaseBit::Float)) => DialectSet::NONE,
        (Base(BaseBit::Signed), Base(BaseBit::Double)) => DialectSet::NONE,
        (Base(BaseBit::Unsigned), Base(BaseBit::Double)) => DialectSet::NONE,
        (Base(BaseBit::Short), Base(BaseBit::Double)) => DialectSet::NONE,
        (Base(BaseBit::Long), Base(BaseBit::Double)) => Dialect::C89.min().union(DialectSet::cpp_any()),
        (Base(BaseBit::Void), _) if is_other_base(b) => DialectSet::NONE,
        (Base(BaseBit::Char), Base(BaseBit::Char8T))
        | (Base(BaseBit::Char), Base(BaseBit::Char16T))
        | (Base(BaseBit::Char), Base(BaseBit::Char32T))
        | (Base(BaseBit::Char), Base(BaseBit::WChar)) => DialectSet::NONE,
        (Storage(StorageBit::Extern), Storage(StorageBit::Static)) => DialectSet::NONE,
        (Storage(StorageBit::Extern), Storage(StorageBit::Register)) => DialectSet::NONE,
        (Storage(StorageBit::Static), Storage(StorageBit::Register)) => DialectSet::NONE,
        (Storage(StorageBit::Static), Storage(StorageBit::ThreadLocal)) => DialectSet::any(),
        (Storage(StorageBit::Const), Storage(StorageBit::Constexpr)) => DialectSet::NONE,
        (Storage(StorageBit::Default), Storage(StorageBit::Delete)) => DialectSet::NONE,
        (Storage(StorageBit::Final), Storage(StorageBit::PureVirtual)) => DialectSet::any(),
        (Storage(StorageBit::RefQualifier), Storage(StorageBit::RvalueRefQualifier)) => DialectSet::NONE,
        (Storage(StorageBit::Register), Storage(StorageBit::Mutable)) => DialectSet::NONE,
        _ => DialectSet::any(),
    }
}

fn is_other_base(b: Bit) -> bool {
    matches!(b, Bit::Base(bit) if bit != BaseBit::Void)
}

/// Normalises the pair so the matrix above only needs to state each
/// combination once, matching §3.1's "lower-triangular, symmetric in
/// semantics" contract.
fn order_pair(a: Bit, b: Bit) -> (Bit, Bit) {
    fn key(bit: Bit) -> (u8, u32) {
        match bit {
            Bit::Base(b) => (0, b.index()),
            Bit::Storage(s) => (1, s.index()),
            Bit::Attribute(a) => (2, a.index()),
        }
    }
    if key(a) <= key(b) {
        (a, b)
    } else {
        (b, a)
    }
}
