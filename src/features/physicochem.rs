// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

//! Physicochemical descriptors of protein sequences, computed the way ProtParam does:
//!
//! - molecular weight (average masses)
//! - aromaticity (fraction of F, W and Y)
//! - instability index (Guruprasad et al., 1990)
//! - isoelectric point (bisection on the net charge)
//! - GRAVY, the mean Kyte-Doolittle hydropathy
//!
//! Only the 20 standard residues are supported.

use log::warn;

use crate::errors::{Result, SeqFeatError};
use crate::features::FeatureMap;

const STANDARD_RESIDUES: &[u8; 20] = b"ACDEFGHIKLMNPQRSTVWY";

fn aa_index(aa: u8) -> Option<usize> {
    STANDARD_RESIDUES.iter().position(|&r| r == aa)
}

// Average masses of the free amino acids, indexed by aa_index().
const AA_WEIGHTS: [f64; 20] = [
    89.0932,  // A
    121.1582, // C
    133.1027, // D
    147.1293, // E
    165.1891, // F
    75.0666,  // G
    155.1546, // H
    131.1729, // I
    146.1876, // K
    131.1729, // L
    149.2113, // M
    132.1179, // N
    115.1305, // P
    146.1445, // Q
    174.201,  // R
    105.0926, // S
    119.1192, // T
    117.1463, // V
    204.2252, // W
    181.1885, // Y
];

const WATER_WEIGHT: f64 = 18.01528;

// Kyte & Doolittle (1982), indexed by aa_index().
const KYTE_DOOLITTLE: [f64; 20] = [
    1.8,  // A
    2.5,  // C
    -3.5, // D
    -3.5, // E
    2.8,  // F
    -0.4, // G
    -3.2, // H
    4.5,  // I
    -3.9, // K
    3.8,  // L
    1.9,  // M
    -3.5, // N
    -1.6, // P
    -3.5, // Q
    -4.5, // R
    -0.8, // S
    -0.7, // T
    4.2,  // V
    -0.9, // W
    -1.3, // Y
];

// Dipeptide instability weight values: DIWV[first][second], both indexed by aa_index().
const DIWV: [[f64; 20]; 20] = [
    // A  C  D  E  F  G  H  I  K  L  M  N  P  Q  R  S  T  V  W  Y
    [1.0, 44.94, -7.49, 1.0, 1.0, 1.0, -7.49, 1.0, 1.0, 1.0, 1.0, 1.0, 20.26, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0], // A
    [1.0, 1.0, 20.26, 1.0, 1.0, 1.0, 33.6, 1.0, 1.0, 20.26, 33.6, 1.0, 20.26, -6.54, 1.0, 1.0, 33.6, -6.54, 24.68, 1.0], // C
    [1.0, 1.0, 1.0, 1.0, -6.54, 1.0, 1.0, 1.0, -7.49, 1.0, 1.0, 1.0, 1.0, 1.0, -6.54, 20.26, -14.03, 1.0, 1.0, 1.0], // D
    [1.0, 44.94, 20.26, 33.6, 1.0, 1.0, -6.54, 20.26, 1.0, 1.0, 1.0, 1.0, 20.26, 20.26, 1.0, 20.26, 1.0, 1.0, -14.03, 1.0], // E
    [1.0, 1.0, 13.34, 1.0, 1.0, 1.0, 1.0, 1.0, -14.03, 1.0, 1.0, 1.0, 20.26, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 33.601], // F
    [-7.49, 1.0, 1.0, -6.54, 1.0, 13.34, 1.0, -7.49, -7.49, 1.0, 1.0, -7.49, 1.0, 1.0, 1.0, 1.0, -7.49, 1.0, 13.34, -7.49], // G
    [1.0, 1.0, 1.0, 1.0, -9.37, -9.37, 1.0, 44.94, 24.68, 1.0, 1.0, 24.68, -1.88, 1.0, 1.0, 1.0, -6.54, 1.0, -1.88, 44.94], // H
    [1.0, 1.0, 1.0, 44.94, 1.0, 1.0, 13.34, 1.0, -7.49, 20.26, 1.0, 1.0, -1.88, 1.0, 1.0, 1.0, 1.0, -7.49, 1.0, 1.0], // I
    [1.0, 1.0, 1.0, 1.0, 1.0, -7.49, 1.0, -7.49, 1.0, -7.49, 33.6, 1.0, -6.54, 24.64, 33.6, 1.0, 1.0, -7.49, 1.0, 1.0], // K
    [1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, -7.49, 1.0, 1.0, 1.0, 20.26, 33.6, 20.26, 1.0, 1.0, 1.0, 24.68, 1.0], // L
    [13.34, 1.0, 1.0, 1.0, 1.0, 1.0, 58.28, 1.0, 1.0, 1.0, -1.88, 1.0, 44.94, -6.54, -6.54, 44.94, -1.88, 1.0, 1.0, 24.68], // M
    [1.0, -1.88, 1.0, 1.0, -14.03, -14.03, 1.0, 44.94, 24.68, 1.0, 1.0, 1.0, -1.88, -6.54, 1.0, 1.0, -7.49, 1.0, -9.37, 1.0], // N
    [20.26, -6.54, -6.54, 18.38, 20.26, 1.0, 1.0, 1.0, 1.0, 1.0, -6.54, 1.0, 20.26, 20.26, -6.54, 20.26, 1.0, 20.26, -1.88, 1.0], // P
    [1.0, -6.54, 20.26, 20.26, -6.54, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 20.26, 20.26, 1.0, 44.94, 1.0, -6.54, 1.0, -6.54], // Q
    [1.0, 1.0, 1.0, 1.0, 1.0, -7.49, 20.26, 1.0, 1.0, 1.0, 1.0, 13.34, 20.26, 20.26, 58.28, 44.94, 1.0, 1.0, 58.28, -6.54], // R
    [1.0, 33.6, 1.0, 20.26, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 44.94, 20.26, 20.26, 20.26, 1.0, 1.0, 1.0, 1.0], // S
    [1.0, 1.0, 1.0, 20.26, 13.34, -7.49, 1.0, 1.0, 1.0, 1.0, 1.0, -14.03, 1.0, -6.54, 1.0, 1.0, 1.0, 1.0, -14.03, 1.0], // T
    [1.0, 1.0, -14.03, 1.0, 1.0, -7.49, 1.0, 1.0, -1.88, 1.0, 1.0, 1.0, 20.26, 1.0, 1.0, 1.0, -7.49, 1.0, 1.0, -6.54], // V
    [-14.03, 1.0, 1.0, 1.0, 1.0, -9.37, 24.68, 1.0, 1.0, 13.34, 24.68, 13.34, 1.0, 1.0, 1.0, 1.0, -14.03, -7.49, 1.0, 1.0], // W
    [24.68, 1.0, 24.68, -6.54, 1.0, -7.49, 13.34, 1.0, 1.0, 1.0, 44.94, 1.0, 13.34, 1.0, -15.91, 1.0, -7.49, 1.0, -9.37, 13.34], // Y
];

// pK values of the ionizable groups (ProtParam / Bjellqvist set).
const PK_NTERM: f64 = 9.0;
const PK_CTERM: f64 = 2.0;
const PK_K: f64 = 10.0;
const PK_R: f64 = 12.0;
const PK_H: f64 = 5.98;
const PK_D: f64 = 4.05;
const PK_E: f64 = 4.45;
const PK_C: f64 = 9.0;
const PK_Y: f64 = 10.0;

// The terminal groups' pK depends on the terminal residue.
fn nterm_pk(first: u8) -> f64 {
    match first {
        b'A' => 7.59,
        b'M' => 7.0,
        b'S' => 6.93,
        b'P' => 8.36,
        b'T' => 6.82,
        b'V' => 7.44,
        b'E' => 7.7,
        _ => PK_NTERM,
    }
}

fn cterm_pk(last: u8) -> f64 {
    match last {
        b'D' => 4.55,
        b'E' => 4.75,
        _ => PK_CTERM,
    }
}

const PI_START_PH: f64 = 7.775;
const PI_MIN_PH: f64 = 4.05;
const PI_MAX_PH: f64 = 12.0;
const PI_TOLERANCE: f64 = 0.0001;

/// Descriptor values for one protein sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProteinDescriptors {
    pub molecular_weight: f64,
    pub aromaticity: f64,
    pub instability_index: f64,
    pub isoelectric_point: f64,
    pub gravy: f64,
}

impl ProteinDescriptors {
    pub fn to_feature_map(&self) -> FeatureMap {
        [
            ("molecular_weight", self.molecular_weight),
            ("aromaticity", self.aromaticity),
            ("instability_index", self.instability_index),
            ("isoelectric_point", self.isoelectric_point),
            ("gravy", self.gravy),
        ]
        .into_iter()
        .collect()
    }
}

// Upper-cases and maps residues to table indices. Fails on the first residue that is not one of
// the 20 standard amino acids (ambiguity codes included), and on the empty sequence.
fn residue_indices(seq: &str) -> Result<Vec<usize>> {
    if seq.is_empty() {
        return Err(SeqFeatError::EmptySequence);
    }
    seq.chars()
        .enumerate()
        .map(|(position, residue)| {
            let upper = residue.to_ascii_uppercase();
            u8::try_from(upper)
                .ok()
                .and_then(aa_index)
                .ok_or(SeqFeatError::UnsupportedResidue { residue, position })
        })
        .collect()
}

/// Molecular weight in Da: the free amino acid masses minus one water per peptide bond.
pub fn molecular_weight(seq: &str) -> Result<f64> {
    let idx = residue_indices(seq)?;
    let sum: f64 = idx.iter().map(|&i| AA_WEIGHTS[i]).sum();
    Ok(sum - (idx.len() as f64 - 1.0) * WATER_WEIGHT)
}

/// Fraction of aromatic residues (Phe, Trp, Tyr).
pub fn aromaticity(seq: &str) -> Result<f64> {
    let idx = residue_indices(seq)?;
    let aromatic = idx
        .iter()
        .filter(|&&i| matches!(STANDARD_RESIDUES[i], b'F' | b'W' | b'Y'))
        .count();
    Ok(aromatic as f64 / idx.len() as f64)
}

/// Instability index: 10 / L times the sum of the DIWV weights of all adjacent pairs. Values
/// above 40 suggest an unstable protein.
pub fn instability_index(seq: &str) -> Result<f64> {
    let idx = residue_indices(seq)?;
    let score: f64 = idx.windows(2).map(|pair| DIWV[pair[0]][pair[1]]).sum();
    Ok(10.0 / idx.len() as f64 * score)
}

/// Grand average of hydropathy.
pub fn gravy(seq: &str) -> Result<f64> {
    let idx = residue_indices(seq)?;
    let sum: f64 = idx.iter().map(|&i| KYTE_DOOLITTLE[i]).sum();
    Ok(sum / idx.len() as f64)
}

// Counts of the charged residues plus the terminal pKs, which is all the net charge depends on.
struct ChargedGroups {
    nterm_pk: f64,
    cterm_pk: f64,
    counts: [f64; 20],
}

impl ChargedGroups {
    fn new(idx: &[usize]) -> Self {
        let mut counts = [0.0; 20];
        for &i in idx {
            counts[i] += 1.0;
        }
        // idx is never empty (see residue_indices())
        ChargedGroups {
            nterm_pk: nterm_pk(STANDARD_RESIDUES[idx[0]]),
            cterm_pk: cterm_pk(STANDARD_RESIDUES[idx[idx.len() - 1]]),
            counts,
        }
    }

    fn count(&self, aa: u8) -> f64 {
        aa_index(aa).map(|i| self.counts[i]).unwrap_or(0.0)
    }

    fn charge_at(&self, ph: f64) -> f64 {
        let positive = |pk: f64| 1.0 / (10_f64.powf(ph - pk) + 1.0);
        let negative = |pk: f64| 1.0 / (10_f64.powf(pk - ph) + 1.0);

        let pos = positive(self.nterm_pk)
            + self.count(b'K') * positive(PK_K)
            + self.count(b'R') * positive(PK_R)
            + self.count(b'H') * positive(PK_H);
        let neg = negative(self.cterm_pk)
            + self.count(b'D') * negative(PK_D)
            + self.count(b'E') * negative(PK_E)
            + self.count(b'C') * negative(PK_C)
            + self.count(b'Y') * negative(PK_Y);
        pos - neg
    }
}

/// pH at which the net charge is zero, by bisection. The search interval starts at
/// [4.05, 12] and is shifted by 4 pH units while the root lies outside it.
pub fn isoelectric_point(seq: &str) -> Result<f64> {
    let idx = residue_indices(seq)?;
    let groups = ChargedGroups::new(&idx);

    let (mut lo, mut hi) = (PI_MIN_PH, PI_MAX_PH);
    // Net charge decreases with pH, so these terminate.
    while groups.charge_at(lo) < 0.0 {
        (lo, hi) = (lo - 4.0, lo);
    }
    while groups.charge_at(hi) > 0.0 {
        (lo, hi) = (hi, hi + 4.0);
    }

    let mut ph = PI_START_PH;
    while hi - lo > PI_TOLERANCE {
        if groups.charge_at(ph) > 0.0 {
            lo = ph;
        } else {
            hi = ph;
        }
        ph = (lo + hi) / 2.0;
    }
    Ok(ph)
}

/// Computes all descriptors, failing on the first unsupported residue.
pub fn analyze_protein(seq: &str) -> Result<ProteinDescriptors> {
    Ok(ProteinDescriptors {
        molecular_weight: molecular_weight(seq)?,
        aromaticity: aromaticity(seq)?,
        instability_index: instability_index(seq)?,
        isoelectric_point: isoelectric_point(seq)?,
        gravy: gravy(seq)?,
    })
}

/// Descriptor map for one sequence. Never fails: a sequence that cannot be analysed yields an
/// empty map, and the reason is logged.
pub fn physicochemical_features(seq: &str) -> FeatureMap {
    match analyze_protein(seq) {
        Ok(descriptors) => descriptors.to_feature_map(),
        Err(e) => {
            warn!("Physicochemical analysis failed: {}", e);
            FeatureMap::new()
        }
    }
}
