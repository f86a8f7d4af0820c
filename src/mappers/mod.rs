/*
Module: mappers

Declares the banked mapper implementations and re-exports their public types. NROM
(mapper 0) lives next to the `Mapper` trait in `crate::mapper`.

Implemented:
- MMC1 (Mapper 1)
- UxROM (Mapper 2)
- CNROM (Mapper 3)
- MMC3 (Mapper 4)
*/

pub mod cnrom;
pub mod mmc1;
pub mod mmc3;
pub mod uxrom;

pub use cnrom::Cnrom;
pub use mmc1::Mmc1;
pub use mmc3::Mmc3;
pub use uxrom::Uxrom;
