// src/noyau/eval.rs
//
// Évaluation récursive de l’arbre sur des rationnels exacts.
// Seuls π, e, √ irrationnelle et ° passent par une approximation (chiffres du registre).

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::Zero;

use super::annulation::Annulation;
use super::arbre::{Noeud, PROFONDEUR_MAX};
use super::calcul::{factorielle, pi, puissance, racine_carree, rationnel_depuis_decimal};
use super::erreur::Erreur;
use super::moteur::Registre;

/// Évalue `noeud`. L’annulation est consultée à l’entrée de chaque nœud.
pub fn evaluer(
    noeud: &Noeud,
    registre: &Registre,
    annulation: &Annulation,
) -> Result<BigRational, Erreur> {
    annulation.verifier()?;
    // un arbre construit à la main peut dépasser ce que la pile supporte
    if noeud.hauteur() > PROFONDEUR_MAX {
        return Err(Erreur::syntaxe("expression trop profonde"));
    }

    if noeud.est_feuille() {
        return resoudre(&noeud.valeur, registre, annulation);
    }

    if noeud.est_appel() {
        let f = registre
            .fonction(&noeud.valeur)
            .ok_or_else(|| Erreur::SymboleIndefini(noeud.valeur.clone()))?;
        // de gauche à droite, arrêt à la première erreur
        let args = noeud
            .arguments()
            .map(|a| evaluer(a, registre, annulation))
            .collect::<Result<Vec<_>, _>>()?;
        return f(&args, annulation);
    }

    let gauche = noeud
        .gauche
        .as_deref()
        .ok_or_else(|| Erreur::syntaxe(format!("opérande manquant pour « {} »", noeud.valeur)))?;
    let a = evaluer(gauche, registre, annulation)?;

    match noeud.droite.as_deref() {
        None => unaire(&noeud.valeur, a, registre, annulation),
        Some(droite) => {
            let b = evaluer(droite, registre, annulation)?;
            binaire(&noeud.valeur, a, b, annulation)
        }
    }
}

/// Feuille : variable, puis constante, puis littéral, puis fonction appelée sans argument.
fn resoudre(
    nom: &str,
    registre: &Registre,
    annulation: &Annulation,
) -> Result<BigRational, Erreur> {
    if let Some(lire) = registre.variable(nom) {
        return Ok(lire());
    }
    if let Some(c) = registre.constante(nom) {
        return Ok(c.clone());
    }
    if let Some(r) = rationnel_depuis_decimal(nom) {
        return Ok(r);
    }
    // "f()" est une feuille : l’arité reste contrôlée par la fonction
    if let Some(f) = registre.fonction(nom) {
        return f(&[], annulation);
    }
    Err(Erreur::SymboleIndefini(nom.to_string()))
}

fn unaire(
    op: &str,
    a: BigRational,
    registre: &Registre,
    annulation: &Annulation,
) -> Result<BigRational, Erreur> {
    match op {
        "!" => factorielle(&a, 1, annulation),
        "°" => Ok(a * pi(registre.chiffres()) / BigRational::from_integer(BigInt::from(180))),
        "√" => racine_carree(&a, registre.chiffres()),
        _ => Err(Erreur::syntaxe(format!("opérateur unaire inconnu « {op} »"))),
    }
}

fn binaire(
    op: &str,
    a: BigRational,
    b: BigRational,
    annulation: &Annulation,
) -> Result<BigRational, Erreur> {
    match op {
        "+" => Ok(a + b),
        "-" => Ok(a - b),
        "*" => Ok(a * b),
        "/" => {
            if b.is_zero() {
                return Err(Erreur::domaine("division par zéro"));
            }
            Ok(a / b)
        }
        "^" => puissance(&a, &b, annulation),
        _ => Err(Erreur::syntaxe(format!("opérateur inconnu « {op} »"))),
    }
}
