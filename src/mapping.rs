//! Scalar kind → RECS type lookup.
//!
//! Two branches: `Narrow` targets recs 1.x (no bigint support, 256-bit values
//! as number arrays), `Wide` targets recs 2.x (bigint for everything past
//! 64 bits).
use crate::ir::RecsType;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// Run-wide target mode. Resolved once, before any translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum TypeMode {
    #[default]
    Narrow,
    Wide,
}

impl TypeMode {
    pub fn is_wide(self) -> bool {
        matches!(self, Self::Wide)
    }

    pub fn describe(self) -> &'static str {
        match self {
            Self::Wide => "2 (bigint support, Entity as string)",
            Self::Narrow => "1 (no bigint, EntityIndex as number)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    Bool,
    U8,
    U16,
    U32,
    U64,
    Usize,
    U128,
    U256,
    Felt252,
    ContractAddress,
}

impl ScalarKind {
    pub const ALL: [ScalarKind; 10] = [
        Self::Bool, Self::U8, Self::U16, Self::U32, Self::U64, Self::Usize,
        Self::U128, Self::U256, Self::Felt252, Self::ContractAddress,
    ];

    /// Case-insensitive lookup; `None` for anything outside the table.
    pub fn parse(scalar_type: &str) -> Option<Self> {
        let kind = match scalar_type.to_ascii_lowercase().as_str() {
            "bool" => Self::Bool,
            "u8" => Self::U8,
            "u16" => Self::U16,
            "u32" => Self::U32,
            "u64" => Self::U64,
            "usize" => Self::Usize,
            "u128" => Self::U128,
            "u256" => Self::U256,
            "felt252" => Self::Felt252,
            "contractaddress" => Self::ContractAddress,
            _ => return None,
        };
        Some(kind)
    }

    pub fn recs_type(self, mode: TypeMode) -> RecsType {
        let wide = mode.is_wide();
        match self {
            Self::Bool => RecsType::Boolean,
            Self::U8 | Self::U16 | Self::U32 | Self::U64 | Self::Usize => RecsType::Number,
            Self::U128 | Self::Felt252 | Self::ContractAddress => {
                if wide { RecsType::BigInt } else { RecsType::Number }
            }
            // narrow mode cannot hold 256 bits in one number
            Self::U256 => {
                if wide { RecsType::BigInt } else { RecsType::NumberArray }
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// API
// ————————————————————————————————————————————————————————————————————————————

/// Unknown scalars fall back to `RecsType.String`.
pub fn map_primitive(scalar_type: &str, mode: TypeMode) -> RecsType {
    ScalarKind::parse(scalar_type)
        .map(|kind| kind.recs_type(mode))
        .unwrap_or(RecsType::String)
}
