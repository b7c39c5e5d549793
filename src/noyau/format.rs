// src/noyau/format.rs
//
// Rendu texte d’un résultat exact.
// Fixe        : 16 chiffres significatifs, arrondi au plus proche, zéros de queue retirés
// Scientifique: m.mmm e±kk
// Fraction    : p/q (forme exacte)

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};
use std::f64::consts::LOG10_2;

use super::calcul::pow10;

/// Chiffres significatifs affichés.
pub const CHIFFRES_AFFICHAGE: usize = 16;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Format {
    #[default]
    Fixe,
    Scientifique,
    Fraction,
}

pub fn formater(r: &BigRational, format: Format) -> String {
    match format {
        Format::Fixe => formater_fixe(r, CHIFFRES_AFFICHAGE),
        Format::Scientifique => formater_scientifique(r, CHIFFRES_AFFICHAGE),
        Format::Fraction => formater_fraction(r),
    }
}

/* ------------------------ Décimal (scaled -> texte) ------------------------ */

/// Convertit un entier “scalé” (×10^digits) en texte décimal.
fn scaled_to_decimal(mut scaled: BigInt, digits: usize) -> String {
    let neg = scaled.is_negative();
    if neg {
        scaled = -scaled;
    }

    let scale = pow10(digits);
    let int_part = &scaled / &scale;
    let frac_part = &scaled % &scale;
    let signe = if neg { "-" } else { "" };

    if digits == 0 {
        return format!("{signe}{int_part}");
    }

    format!("{signe}{int_part}.{:0>digits$}", frac_part.to_str_radix(10))
}

/// "2.5000" -> "2.5", "3.000" -> "3"
fn elaguer(mut s: String) -> String {
    if s.contains('.') {
        let garde = s.trim_end_matches('0').trim_end_matches('.').len();
        s.truncate(garde);
    }
    s
}

/// round(a * 10^e), demi vers le haut (a >= 0). Entiers seulement : pas de pgcd.
fn arrondi_decale(a: &BigRational, e: i64) -> BigInt {
    let (mut n, mut d) = (a.numer() * 2, a.denom() * 2);
    if e >= 0 {
        n *= pow10(e as usize);
    } else {
        d *= pow10(e.unsigned_abs() as usize);
    }
    (n + &d / 2) / d
}

/// a >= 10^k ?
fn atteint(a: &BigRational, k: i64) -> bool {
    if k >= 0 {
        a.numer() >= &(a.denom() * pow10(k as usize))
    } else {
        a.numer() * pow10(k.unsigned_abs() as usize) >= *a.denom()
    }
}

/// floor(log10(a)) pour a > 0, estimé par les tailles en bits puis corrigé.
fn exposant10(a: &BigRational) -> i64 {
    let bits = a.numer().bits() as i64 - a.denom().bits() as i64;
    // a est dans [2^(bits-1), 2^(bits+1)[ : l’estimation est à un cran près
    let mut k = (bits as f64 * LOG10_2).floor() as i64;
    while !atteint(a, k) {
        k -= 1;
    }
    while atteint(a, k + 1) {
        k += 1;
    }
    k
}

/* ------------------------ Formats ------------------------ */

fn formater_fixe(r: &BigRational, significatifs: usize) -> String {
    if r.is_integer() {
        return r.numer().to_string();
    }

    let a = r.abs();
    let k = exposant10(&a);
    let decimales = (significatifs as i64 - 1 - k).max(0) as usize;

    let texte = elaguer(scaled_to_decimal(arrondi_decale(&a, decimales as i64), decimales));
    if r.is_negative() && texte != "0" {
        format!("-{texte}")
    } else {
        texte
    }
}

fn formater_scientifique(r: &BigRational, significatifs: usize) -> String {
    if r.is_zero() {
        return "0".into();
    }

    let a = r.abs();
    let mut k = exposant10(&a);

    // mantisse * 10^decimales = a * 10^(decimales - k)
    let decimales = significatifs.saturating_sub(1);
    let mut scaled = arrondi_decale(&a, decimales as i64 - k);
    // 9.99..95 arrondi à 10
    if scaled >= pow10(decimales + 1) {
        scaled /= 10;
        k += 1;
    }

    let signe = if r.is_negative() { "-" } else { "" };
    let signe_k = if k < 0 { '-' } else { '+' };
    format!(
        "{signe}{}e{signe_k}{:02}",
        elaguer(scaled_to_decimal(scaled, decimales)),
        k.unsigned_abs()
    )
}

fn formater_fraction(r: &BigRational) -> String {
    let n = r.numer();
    let d = r.denom();
    if d.is_one() {
        format!("{n}")
    } else {
        format!("{n}/{d}")
    }
}
