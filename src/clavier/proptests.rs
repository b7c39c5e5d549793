//! Tests par propriétés du curseur : suites de touches aléatoires.

use std::sync::Arc;
use std::time::Duration;

use proptest::prelude::*;

use crate::clavier::{Curseur, Touche, CURSEUR, NAN};
use crate::noyau::calcul::rationnel_depuis_decimal;
use crate::noyau::{reglages_scientifiques, Memoire, Moteur, Reglage, CHIFFRES_DEFAUT};

/// Touches sans grands nombres possibles (pas de !, ^, x², 10ⁿ) : '=' reste rapide.
const SURES: &[&str] = &[
    "0", "1", "2", "3", "4", "5", "6", "7", "8", "9", "+", "-", "×", "÷", "()", ".", ",", "↩",
    "AC", "=", "π", "e", "√", "sin", "cos", "°", "1/°", "gdc",
];

/// Toutes les touches sauf '=' : aucune évaluation.
fn touche_d_edition() -> impl Strategy<Value = &'static str> {
    prop::sample::select(
        Touche::LIBELLES
            .iter()
            .copied()
            .filter(|t| *t != "=")
            .collect::<Vec<_>>(),
    )
}

fn touche_sure() -> impl Strategy<Value = &'static str> {
    prop::sample::select(SURES)
}

fn curseur(memoire: Arc<Memoire>) -> Curseur {
    let mut moteur = Moteur::new(reglages_scientifiques(memoire, CHIFFRES_DEFAUT));
    moteur.appliquer([Reglage::Delai(Duration::from_millis(500))]);
    Curseur::avec_moteur(moteur)
}

/// Un seul marqueur, en fin ; au plus un point par nombre.
fn en_edition_bien_forme(affichage: &str) -> bool {
    affichage.ends_with(CURSEUR)
        && affichage.matches(CURSEUR).count() == 1
        && affichage
            .split(|c: char| !(c.is_ascii_digit() || c == '.'))
            .all(|nombre| nombre.matches('.').count() <= 1)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn edition_toujours_bien_formee(touches in prop::collection::vec(touche_d_edition(), 0..40)) {
        let mut c = curseur(Arc::new(Memoire::zero()));
        for t in &touches {
            c.faire(t);
            let affichage = c.to_string();
            prop_assert!(en_edition_bien_forme(&affichage), "{:?} -> {:?}", touches, affichage);
        }
    }

    #[test]
    fn trois_etats_d_affichage(touches in prop::collection::vec(touche_sure(), 0..16)) {
        let mut c = curseur(Arc::new(Memoire::zero()));
        for t in &touches {
            c.faire(t);
            let affichage = c.to_string();

            if affichage == NAN {
                prop_assert!(c.verifier().is_err());
            } else if affichage.ends_with(CURSEUR) {
                prop_assert!(en_edition_bien_forme(&affichage), "{:?} -> {:?}", touches, affichage);
            } else {
                // résultat nu
                prop_assert!(c.verifier().is_ok());
                prop_assert!(
                    rationnel_depuis_decimal(&affichage).is_some(),
                    "{:?} -> {:?}", touches, affichage
                );
            }
        }
    }

    #[test]
    fn egal_idempotent(touches in prop::collection::vec(touche_sure(), 1..12)) {
        let memoire = Arc::new(Memoire::zero());
        let mut c = curseur(Arc::clone(&memoire));
        for t in &touches {
            c.faire(t);
        }
        c.faire("=");

        let avant = c.to_string();
        prop_assume!(avant != NAN && !avant.ends_with(CURSEUR));
        let valeur = memoire.lire();

        c.faire("=");
        prop_assert_eq!(c.to_string(), avant);
        prop_assert_eq!(memoire.lire(), valeur);
    }
}
