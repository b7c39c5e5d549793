// src/noyau/calcul.rs
//
// Primitives numériques exactes (rationnels / big int)
// ----------------------------------------------------
// - factorielle (avec pas), pgcd, ppcm, puissance entière : exactes + annulables
// - √, π, e : exactes quand c’est possible, sinon approchées à `chiffres` décimales
// - ponts texte décimal / f64 -> rationnel

use num_bigint::{BigInt, BigUint};
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};
use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};

use super::annulation::Annulation;
use super::erreur::Erreur;

/* ------------------------ Outils ------------------------ */

pub(crate) fn pow10(n: usize) -> BigInt {
    BigInt::from(10).pow(n as u32)
}

/// Partie entière exacte si `r` est entier.
fn entier(r: &BigRational) -> Option<BigInt> {
    r.is_integer().then(|| r.to_integer())
}

/* ------------------------ Factorielle / pgcd / ppcm ------------------------ */

/// n! = n * (n-pas) * (n-2*pas) * ... (termes > 0)
/// Domaine : n entier >= 0, pas >= 1.
pub fn factorielle(
    n: &BigRational,
    pas: u32,
    annulation: &Annulation,
) -> Result<BigRational, Erreur> {
    annulation.verifier()?;

    if n.is_negative() {
        return Err(Erreur::domaine("factorielle d’un nombre négatif"));
    }
    let n = entier(n).ok_or_else(|| Erreur::domaine("factorielle d’un non-entier"))?;
    if pas == 0 {
        return Err(Erreur::domaine("factorielle : pas nul"));
    }

    let pas = BigInt::from(pas);
    let mut acc = BigInt::one();
    let mut i = n;
    while i.is_positive() {
        annulation.verifier()?;
        acc *= &i;
        i -= &pas;
    }

    Ok(BigRational::from_integer(acc))
}

/// Algorithme d’Euclide ; pgcd(0, 0) = 0.
pub fn pgcd(x: &BigRational, y: &BigRational, annulation: &Annulation) -> Result<BigRational, Erreur> {
    annulation.verifier()?;

    let (a, b) = entiers_pour("gdc", x, y)?;
    Ok(BigRational::from_integer(pgcd_entier(a, b, annulation)?))
}

/// ppcm(x, y) = |x*y| / pgcd(x, y) ; 0 si l’un des deux est nul.
pub fn ppcm(x: &BigRational, y: &BigRational, annulation: &Annulation) -> Result<BigRational, Erreur> {
    annulation.verifier()?;

    let (a, b) = entiers_pour("lcm", x, y)?;
    let g = pgcd_entier(a.clone(), b.clone(), annulation)?;
    if g.is_zero() {
        return Ok(BigRational::zero());
    }

    Ok(BigRational::from_integer((a * b).abs() / g))
}

fn entiers_pour(nom: &str, x: &BigRational, y: &BigRational) -> Result<(BigInt, BigInt), Erreur> {
    match (entier(x), entier(y)) {
        (Some(a), Some(b)) => Ok((a, b)),
        _ => Err(Erreur::domaine(format!("{nom} exige des arguments entiers"))),
    }
}

fn pgcd_entier(a: BigInt, b: BigInt, annulation: &Annulation) -> Result<BigInt, Erreur> {
    let mut a = a.abs();
    let mut b = b.abs();
    while !b.is_zero() {
        annulation.verifier()?;
        let r = &a % &b;
        a = b;
        b = r;
    }
    Ok(a)
}

/* ------------------------ Puissance entière ------------------------ */

/// base^exp pour un exposant entier (négatif => inverse).
/// Les exposants non entiers sont refusés (limite volontaire).
pub fn puissance(
    base: &BigRational,
    exp: &BigRational,
    annulation: &Annulation,
) -> Result<BigRational, Erreur> {
    annulation.verifier()?;

    if base.is_zero() && exp.is_zero() {
        return Err(Erreur::domaine("0^0 est indéfini"));
    }
    let n = entier(exp).ok_or_else(|| Erreur::domaine("exposant non entier"))?;

    if n.is_zero() {
        return Ok(BigRational::one());
    }
    if base.is_zero() {
        if n.is_negative() {
            return Err(Erreur::domaine("division par zéro"));
        }
        return Ok(BigRational::zero());
    }

    // exponentiation rapide sur les bits de |n|
    let mut e: BigUint = n.magnitude().clone();
    let mut acc = BigRational::one();
    let mut b = base.clone();

    while !e.is_zero() {
        annulation.verifier()?;
        if (&e % 2u32).is_one() {
            acc *= b.clone();
        }
        e >>= 1usize;
        if !e.is_zero() {
            b *= b.clone();
        }
    }

    if n.is_negative() {
        return Ok(acc.recip());
    }
    Ok(acc)
}

/* ------------------------ √ ------------------------ */

/// √x : exacte si numérateur et dénominateur sont des carrés parfaits,
/// sinon troncature à `chiffres` décimales.
pub fn racine_carree(x: &BigRational, chiffres: usize) -> Result<BigRational, Erreur> {
    if x.is_negative() {
        return Err(Erreur::domaine("racine carrée d’un nombre négatif"));
    }

    let n = x.numer();
    let d = x.denom();
    let rn = n.sqrt();
    let rd = d.sqrt();
    if &(&rn * &rn) == n && &(&rd * &rd) == d {
        return Ok(BigRational::new(rn, rd));
    }

    // floor(√(n/d) · 10^c) = floor(√(floor(n · 10^2c / d)))
    let echelle = (n * pow10(2 * chiffres) / d).sqrt();
    Ok(BigRational::new(echelle, pow10(chiffres)))
}

/* ------------------------ π (Machin) + cache ------------------------ */

/// arctan(1/q) · 10^n, tronqué : Σ (-1)^k / ((2k+1) q^(2k+1)).
fn arctan_inverse(q: u32, echelle: &BigInt) -> BigInt {
    let q2 = BigInt::from(q * q);
    let mut puissance = echelle / q; // echelle / q^(2k+1)
    let mut somme = BigInt::zero();

    for k in 0u32.. {
        let terme = &puissance / (2 * k + 1);
        if terme.is_zero() {
            break;
        }
        if k % 2 == 0 {
            somme += terme;
        } else {
            somme -= terme;
        }
        puissance /= &q2;
    }
    somme
}

/// π tronqué à `chiffres` décimales, mis en cache par précision.
pub fn pi(chiffres: usize) -> BigRational {
    static CACHE: OnceLock<Mutex<HashMap<usize, BigRational>>> = OnceLock::new();

    // cache seulement : un verrou empoisonné reste exploitable
    let mut cache = CACHE
        .get_or_init(Default::default)
        .lock()
        .unwrap_or_else(|e| e.into_inner());

    cache
        .entry(chiffres)
        .or_insert_with(|| {
            // 10 chiffres de garde contre les troncatures de la série
            let garde = pow10(10);
            let echelle = pow10(chiffres) * &garde;
            // Machin : π = 16·arctan(1/5) - 4·arctan(1/239)
            let pi = arctan_inverse(5, &echelle) * 16 - arctan_inverse(239, &echelle) * 4;
            BigRational::new(pi / garde, pow10(chiffres))
        })
        .clone()
}

/// e = Σ 1/k! tronqué à `chiffres` décimales.
pub fn euler(chiffres: usize) -> BigRational {
    let extra = 10usize;
    let scale = pow10(chiffres + extra);

    let mut somme = BigInt::zero();
    let mut terme = scale;
    let mut k = 0u64;
    while !terme.is_zero() {
        somme += &terme;
        k += 1;
        terme /= k;
    }

    BigRational::new(somme / pow10(extra), pow10(chiffres))
}

/* ------------------------ Ponts texte / f64 ------------------------ */

/// "12", "2.5", ".5", "10856." -> rationnel exact. Refuse "." et tout autre caractère.
pub fn rationnel_depuis_decimal(s: &str) -> Option<BigRational> {
    let (neg, corps) = match s.strip_prefix('-') {
        Some(reste) => (true, reste),
        None => (false, s),
    };

    let (ent, frac) = corps.split_once('.').unwrap_or((corps, ""));
    if ent.is_empty() && frac.is_empty() {
        return None;
    }
    if !ent.chars().chain(frac.chars()).all(|c| c.is_ascii_digit()) {
        return None;
    }

    let chiffres = format!("{ent}{frac}");
    let n = BigInt::parse_bytes(chiffres.as_bytes(), 10)?;
    let r = BigRational::new(n, pow10(frac.len()));

    Some(if neg { -r } else { r })
}

/// f64 -> rationnel via son écriture décimale la plus courte (jamais exponentielle en Rust).
pub fn rationnel_depuis_f64(f: f64) -> Result<BigRational, Erreur> {
    if !f.is_finite() {
        return Err(Erreur::domaine(format!("résultat non fini ({f})")));
    }
    rationnel_depuis_decimal(&f.to_string())
        .ok_or_else(|| Erreur::domaine(format!("flottant illisible ({f})")))
}

pub fn vers_f64(r: &BigRational) -> Result<f64, Erreur> {
    r.to_f64()
        .filter(|f| f.is_finite())
        .ok_or_else(|| Erreur::domaine("valeur hors de portée des flottants"))
}
