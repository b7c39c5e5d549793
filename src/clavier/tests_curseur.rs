//! Tests du curseur (campagne) : scénarios de touches de bout en bout.
//!
//! Chaque scénario part d’un curseur neuf sur le clavier scientifique,
//! sauf les suites enchaînées (mémoire, idempotence).

use std::sync::Arc;
use std::time::{Duration, Instant};

use num_bigint::BigInt;
use num_rational::BigRational;

use super::{Curseur, CURSEUR, NAN};
use crate::noyau::{reglages_scientifiques, Erreur, Memoire, Moteur, CHIFFRES_DEFAUT};

fn neuf() -> (Curseur, Arc<Memoire>) {
    let memoire = Arc::new(Memoire::zero());
    (Curseur::new(Arc::clone(&memoire)), memoire)
}

fn taper(touches: &[&str]) -> String {
    let (mut c, _) = neuf();
    for t in touches {
        c.faire(t);
    }
    c.to_string()
}

fn q(n: i64) -> BigRational {
    BigRational::from_integer(BigInt::from(n))
}

/// Budget global anti-gel.
fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Suite enchaînée ------------------------ */

#[test]
fn cur_suite_enchainee() {
    let (mut c, memoire) = neuf();

    let etapes: &[(&str, &str)] = &[
        ("+", "_"),
        ("-", "-_"),
        ("6", "-6_"),
        ("()", "-6×(_"),
        ("()", "-6×((_"),
        ("2", "-6×((2_"),
        ("-", "-6×((2-_"),
        ("-", "-6×((2+_"),
        ("-", "-6×((2-_"),
        ("7", "-6×((2-7_"),
        ("()", "-6×((2-7)_"),
        ("0", "-6×((2-7)×0_"),
        (".", "-6×((2-7)×0._"),
        ("6", "-6×((2-7)×0.6_"),
        ("=", "18"),
        ("+", "ANS+_"),
        ("9", "ANS+9_"),
        ("=", "27"),
    ];

    for (i, (touche, attendu)) in etapes.iter().enumerate() {
        c.faire(touche);
        assert_eq!(c.to_string(), *attendu, "étape #{:02} ({touche:?})", i + 1);
    }
    assert_eq!(memoire.lire(), q(27));
    assert_eq!(c.verifier(), Ok(()));
}

#[test]
fn cur_bout_en_bout_meme_valeur_que_le_moteur() {
    let (mut c, memoire) = neuf();
    for t in ["-", "6", "()", "()", "2", "-", "-", "-", "7", "()", "0", ".", "6", "="] {
        c.faire(t);
    }

    let moteur = Moteur::new(reglages_scientifiques(
        Arc::new(Memoire::zero()),
        CHIFFRES_DEFAUT,
    ));
    let direct = moteur.analyser("-6×((2-7)×0.6)").unwrap();

    assert_eq!(direct, q(18));
    assert_eq!(memoire.lire(), direct);
    assert_eq!(c.to_string(), "18");
}

#[test]
fn cur_double_moins_donne_plus() {
    // deux '-' consécutifs retournent le signe
    assert_eq!(
        taper(&["-", "6", "()", "()", "2", "-", "-", "7", "()", "0", ".", "6", "="]),
        "-32.4"
    );
}

/* ------------------------ Mémoire ------------------------ */

#[test]
fn cur_egal_idempotent() {
    let (mut c, memoire) = neuf();
    for t in ["1", "1", "÷", "2", "9", "="] {
        c.faire(t);
    }
    assert_eq!(c.to_string(), "0.3793103448275862");
    let valeur = memoire.lire();
    assert_eq!(valeur, BigRational::new(BigInt::from(11), BigInt::from(29)));

    c.faire("=");
    assert_eq!(c.to_string(), "0.3793103448275862");
    assert_eq!(memoire.lire(), valeur);
}

#[test]
fn cur_reprise_du_resultat() {
    let (mut c, memoire) = neuf();
    for t in ["4", "×", "5", "="] {
        c.faire(t);
    }
    assert_eq!(memoire.lire(), q(20));

    assert_eq!(c.faire("5").to_string(), "ANS×5_");
    assert_eq!(c.faire("=").to_string(), "100");

    assert_eq!(c.faire("√").to_string(), "ANS×√_");
    assert_eq!(c.faire("↩").to_string(), "ANS×_");
    assert_eq!(c.faire("↩").to_string(), "ANS_");
    // "ANS" s’efface d’un seul coup
    assert_eq!(c.faire("↩").to_string(), "_");
}

#[test]
fn cur_memoire_partagee() {
    let memoire = Arc::new(Memoire::zero());
    let mut a = Curseur::new(Arc::clone(&memoire));
    let mut b = Curseur::new(Arc::clone(&memoire));

    for t in ["7", "x²", "="] {
        a.faire(t);
    }
    assert_eq!(a.to_string(), "49");

    // un autre curseur lit le même ANS
    assert_eq!(b.moteur().variable("ANS"), Some(q(49)));
    for t in ["AC", "3", "×", "()", "ANS"] {
        b.faire(t);
    }
    assert_eq!(b.to_string(), NAN);
    assert_eq!(b.verifier(), Err(Erreur::ActionInconnue("ANS".into())));
}

/* ------------------------ Scénarios d’édition ------------------------ */

#[test]
fn cur_scenarios() {
    let (mut erreur_puis, _) = neuf();
    erreur_puis
        .faire("4")
        .erreur(Erreur::Domaine("test".into()))
        .faire("↩");
    assert_eq!(erreur_puis.to_string(), "_");

    let cas: &[(&[&str], &str)] = &[
        (&["9", "8", "8", "3", ".", "6", "2", "AC", "4", "()"], "4×(_"),
        (&["4", "()", "4", "AC", ".", "6", "()", "+", "5", "×"], "6×(5×_"),
        (&["AC", "1", "0", "8", "5", "6", "."], "10856._"),
        (&["()", "=", "9", "9", "÷", "AC", "6", "↩", "AC", "2"], "2_"),
        (&["×", "↩", "=", "6", "()", "4", "6", "4", "AC", "5"], "5_"),
        (&["6", "+", "5", "8", "-", "AC", "AC", "7", "5"], "75_"),
        (&["9", ".", "6", "3", ".", ".", "+", "3", "7"], "9.63+37_"),
        (&["4", "↩", "1", "1", "÷", "2", "9", "×", "="], "0.3793103448275862"),
    ];

    for (touches, attendu) in cas {
        assert_eq!(taper(touches), *attendu, "{touches:?}");
    }
}

#[test]
fn cur_resultats_scientifiques() {
    let cas: &[(&[&str], &str)] = &[
        (&["2", "+", "3", "×", "4", "="], "14"),
        (&["1", "-", "2", "-", "3", "="], "-4"),
        (&["6", "!", "="], "720"),
        (&["√", "9", "="], "3"),
        (&["3", "x²", "="], "9"),
        (&["2", "xⁿ", "3", "xⁿ", "2", "="], "512"),
        (&["10ⁿ", "3", "="], "1000"),
        (&["π", "="], "3.141592653589793"),
        (&["e", "="], "2.718281828459045"),
        (&["eⁿ", "2", "="], "7.38905609893065"),
        (&["1", "8", "0", "°", "="], "3.141592653589793"),
        (&["π", "1/°", "="], "180"),
        (&["cos", "0", "="], "1"),
        (&["log", "1", "0", "0", "="], "2"),
        (&["gdc", "1", "2", ",", "1", "8", "="], "6"),
        (&["lcm", "4", ",", "6", "="], "12"),
        (&["2", "sin", "0", "="], "0"),
    ];

    for (touches, attendu) in cas {
        assert_eq!(taper(touches), *attendu, "{touches:?}");
    }
}

#[test]
fn cur_erreurs_affichent_nan() {
    let cas: &[&[&str]] = &[
        &["1", "÷", "0", "="],
        &["()", "-", "1", "()", "!", "="],
        &["√", "-", "4", "="],
        &["0", "xⁿ", "0", "="],
        &["sin⁻¹", "2", "="],
        &["ln", "0", "="],
        &["2", "xⁿ", "0", ".", "5", "="],
    ];

    for touches in cas {
        let (mut c, _) = neuf();
        for t in touches.iter() {
            c.faire(t);
        }
        assert_eq!(c.to_string(), NAN, "{touches:?}");
        assert!(matches!(c.verifier(), Err(Erreur::Domaine(_))), "{touches:?}");
    }
}

#[test]
fn cur_reprise_apres_erreur() {
    let (mut c, memoire) = neuf();
    for t in ["5", "=", "1", "÷", "0", "="] {
        c.faire(t);
    }
    assert_eq!(c.to_string(), NAN);
    // la mémoire garde le dernier résultat valide
    assert_eq!(memoire.lire(), q(5));

    assert_eq!(c.faire("3").to_string(), "3_");
    assert_eq!(c.verifier(), Ok(()));
    assert_eq!(c.faire("=").to_string(), "3");
}

/* ------------------------ Stress contrôlé ------------------------ */

#[test]
fn cur_stress_saisie_longue() {
    let t0 = Instant::now();
    let max = Duration::from_millis(500);

    let (mut c, _) = neuf();
    for k in 0..200 {
        c.faire(if k % 2 == 0 { "7" } else { "+" });
        budget(t0, max);
    }
    c.faire("=");
    budget(t0, max);

    // 100 fois 7, le dernier '+' est abandonné
    assert_eq!(c.to_string(), "700");
}

#[test]
fn cur_stress_parentheses_imbriquees() {
    let t0 = Instant::now();
    let max = Duration::from_millis(500);

    let (mut c, _) = neuf();
    for _ in 0..60 {
        c.faire("()");
    }
    c.faire("2");
    budget(t0, max);

    let affichage = c.to_string();
    assert!(affichage.ends_with(&format!("2{CURSEUR}")));

    // '=' ferme les 60 parenthèses
    c.faire("=");
    budget(t0, max);
    assert_eq!(c.to_string(), "2");
}
