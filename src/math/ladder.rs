//! Exponentiation ladder for the tick lattice.
//!
//! The lattice step is half a basis point in log space: tick `i` maps to
//! `exp(0.0001)^(i/2)`, which drifts from `sqrt(1.0001)^i` by roughly
//! `2.5e-9` per tick in log space. Entry `k` of each table is `exp(0.0001)^(±2^k / 2)` written as
//! `mantissa * 2^offset`. The values are the contract's own constants and
//! must not be recomputed: the point is to reproduce the contract's rounding,
//! not the exact real number.

use crate::num::Nat;

/// Number of ladder steps per direction; ticks up to `2^LADDER_STEPS - 1`
/// in magnitude can be exponentiated.
pub const LADDER_STEPS: usize = 20;

/// A value `v * 2^offset`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FixedPoint {
    pub v: Nat,
    pub offset: i64,
}

impl FixedPoint {
    pub fn one() -> Self {
        Self {
            v: Nat::one(),
            offset: 0,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct LadderKey {
    pub exp: usize,
    pub positive: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LadderEntry {
    pub mantissa: u128,
    pub offset: i64,
}

const fn entry(mantissa: u128, offset: i64) -> LadderEntry {
    LadderEntry { mantissa, offset }
}

/// `exp(0.0001)^(2^k / 2)`.
pub const POSITIVE_LADDER: [LadderEntry; LADDER_STEPS] = [
    entry(38687560557337355742483221, -85),
    entry(38689494983725479307861971, -85),
    entry(38693364126677775184793561, -85),
    entry(38701103573421987005215721, -85),
    entry(38716587111352494729706462, -85),
    entry(38747572773653928660613512, -85),
    entry(38809618513447185627569983, -85),
    entry(38934008210058939100663682, -85),
    entry(39183984934869404935943141, -85),
    entry(39688763633815974521145659, -85),
    entry(40717912888646086984030507, -85),
    entry(42856962434838368098529959, -85),
    entry(47478079282778087338933597, -85),
    entry(29134438707490415855866100, -84),
    entry(43882733799120415566608322, -84),
    entry(49778031622173924435819796, -83),
    entry(32025492072892644517427309, -80),
    entry(53023938993515524338629870, -76),
    entry(36338278329035183585718600, -66),
    entry(34133361681864713959105863, -47),
];

/// `exp(0.0001)^(-2^k / 2)`.
pub const NEGATIVE_LADDER: [LadderEntry; LADDER_STEPS] = [
    entry(19341845997356488514015570, -84),
    entry(2417609866154190654524678, -81),
    entry(38677889876083546261210550, -85),
    entry(38670155071614559132217310, -85),
    entry(19327345051392939314248854, -84),
    entry(19311889358453304431405214, -84),
    entry(77124060166079386301517011, -86),
    entry(38438828813936263312862610, -85),
    entry(76387211720013513967242610, -86),
    entry(75415686436335201065707301, -86),
    entry(73509547540888574991368714, -86),
    entry(17460146398643019245576278, -84),
    entry(126085780994910985395717054, -87),
    entry(102735988268212419722671870, -87),
    entry(68208042073114503830679361, -87),
    entry(60130046442422405275353178, -88),
    entry(11682706336100247487260846, -88),
    entry(56449132412055094618915006, -95),
    entry(20592303012757789234393034, -103),
    entry(1370156647050591448120178, -118),
];

/// Looks up a ladder entry, `None` past the last step.
pub fn ladder_entry(key: LadderKey) -> Option<FixedPoint> {
    let table = if key.positive {
        &POSITIVE_LADDER
    } else {
        &NEGATIVE_LADDER
    };
    table.get(key.exp).map(|e| FixedPoint {
        v: Nat::from(e.mantissa),
        offset: e.offset,
    })
}

#[inline]
pub fn fixed_point_mul(a: &FixedPoint, b: &FixedPoint) -> FixedPoint {
    FixedPoint {
        v: &a.v * &b.v,
        offset: a.offset + b.offset,
    }
}

/// Exponentiation by squaring over the ladder: multiplies in the entry for
/// every set bit of `abs_tick`.
///
/// Returns `None` when `abs_tick` has a bit beyond the ladder's reach.
pub fn half_bps_pow(abs_tick: u64, positive: bool) -> Option<FixedPoint> {
    let mut acc = FixedPoint::one();
    let mut key = LadderKey { exp: 0, positive };
    let mut tick = abs_tick;

    while tick != 0 {
        if tick % 2 == 1 {
            acc = fixed_point_mul(&ladder_entry(key)?, &acc);
        }
        tick /= 2;
        key.exp += 1;
    }
    Some(acc)
}
