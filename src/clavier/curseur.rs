// src/clavier/curseur.rs
//
// Curseur : suite de touches -> texte toujours bien formé (à la manière d’une calculatrice de poche).
// --------------------------------------------------------------------------------------------
// Trois états d’affichage :
// - édition  : le texte finit par le marqueur '_'
// - résultat : valeur formatée nue (après '=')
// - erreur   : "NaN", l’erreur reste consultable via `verifier`
//
// Chaque touche : preparer (retire '_', ou efface "NaN", ou reprend le résultat sous "ANS"),
// puis l’édition proprement dite, puis remise du marqueur.
// L’état de l’expression partielle est lu directement dans le texte.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::noyau::{
    formater, reglages_scientifiques, Annulation, Erreur, Format, Memoire, Moteur, CHIFFRES_DEFAUT,
};

use super::saisie::{est_chiffre, est_un_de, Saisie};

/// Marqueur d’édition.
pub const CURSEUR: char = '_';
/// Affichage après une erreur.
pub const NAN: &str = "NaN";
/// Nom du résultat précédent dans une nouvelle saisie.
pub const ANS: &str = "ANS";

/// Derniers caractères qui terminent une valeur (en plus des chiffres).
const FIN_DE_VALEUR: &str = ")πe!°";

/* ------------------------ Touches ------------------------ */

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Touche {
    Chiffre(char),
    Plus,
    Moins,
    Fois,
    Divise,
    Puissance,
    Carre,
    Parentheses,
    Point,
    Virgule,
    Effacer,
    ToutEffacer,
    Egal,
    Degres,
    Radians,
    Factorielle,
    Racine,
    Pi,
    Euler,
    EPuissance,
    DixPuissance,
    /// Nom de fonction du moteur (sin, arcsin, gdc, ...).
    Appel(&'static str),
}

impl Touche {
    /// Libellés reconnus par `Curseur::faire`.
    pub const LIBELLES: [&'static str; 40] = [
        "0", "1", "2", "3", "4", "5", "6", "7", "8", "9", "+", "-", "×", "÷", "xⁿ", "x²", "()",
        ".", ",", "↩", "AC", "=", "°", "1/°", "!", "√", "π", "e", "eⁿ", "10ⁿ", "sin", "cos",
        "tan", "sin⁻¹", "cos⁻¹", "tan⁻¹", "log", "ln", "gdc", "lcm",
    ];
}

impl FromStr for Touche {
    type Err = Erreur;

    fn from_str(s: &str) -> Result<Self, Erreur> {
        use Touche::*;

        let touche = match s {
            "+" => Plus,
            "-" => Moins,
            "×" => Fois,
            "÷" => Divise,
            "xⁿ" => Puissance,
            "x²" => Carre,
            "()" => Parentheses,
            "." => Point,
            "," => Virgule,
            "↩" => Effacer,
            "AC" => ToutEffacer,
            "=" => Egal,
            "°" => Degres,
            "1/°" => Radians,
            "!" => Factorielle,
            "√" => Racine,
            "π" => Pi,
            "e" => Euler,
            "eⁿ" => EPuissance,
            "10ⁿ" => DixPuissance,
            "sin" => Appel("sin"),
            "cos" => Appel("cos"),
            "tan" => Appel("tan"),
            "sin⁻¹" => Appel("arcsin"),
            "cos⁻¹" => Appel("arccos"),
            "tan⁻¹" => Appel("arctan"),
            "log" => Appel("log"),
            "ln" => Appel("ln"),
            "gdc" => Appel("gdc"),
            "lcm" => Appel("lcm"),
            _ => {
                let mut cs = s.chars();
                match (cs.next(), cs.next()) {
                    (Some(c), None) if c.is_ascii_digit() => Chiffre(c),
                    _ => return Err(Erreur::ActionInconnue(s.to_string())),
                }
            }
        };

        Ok(touche)
    }
}

/* ------------------------ Curseur ------------------------ */

/// Suite de l’édition : remettre le marqueur, ou laisser un résultat nu.
enum Suite {
    Marqueur,
    Nu,
}

#[derive(Clone)]
pub struct Curseur {
    texte: Saisie,
    pret: bool,
    erreur: Option<Erreur>,
    moteur: Moteur,
    annulation: Annulation,
}

fn finit_une_valeur(t: &Saisie) -> bool {
    t.finit_par(ANS) || est_chiffre(t.dernier()) || est_un_de(t.dernier(), FIN_DE_VALEUR)
}

impl Curseur {
    /// Clavier scientifique ; `memoire` reçoit chaque résultat et sert "ANS".
    pub fn new(memoire: Arc<Memoire>) -> Self {
        Self::avec_moteur(Moteur::new(reglages_scientifiques(memoire, CHIFFRES_DEFAUT)))
    }

    /// Moteur quelconque : il doit fournir `save` (appelée par '=') et `ANS`.
    pub fn avec_moteur(moteur: Moteur) -> Self {
        Self {
            texte: Saisie::new(&CURSEUR.to_string()),
            pret: false,
            erreur: None,
            moteur,
            annulation: Annulation::aucune(),
        }
    }

    /// Reprend un affichage existant (édition, résultat ou "NaN").
    pub fn avec_texte(mut self, texte: &str) -> Self {
        self.texte = Saisie::new(texte);
        self
    }

    pub fn moteur(&self) -> &Moteur {
        &self.moteur
    }

    /// Libellé de touche -> transition. Libellé inconnu : "NaN" + ActionInconnue.
    pub fn faire(&mut self, action: &str) -> &mut Self {
        match action.parse::<Touche>() {
            Ok(touche) => self.appuyer(touche),
            Err(e) => self.erreur(e),
        }
    }

    pub fn appuyer(&mut self, touche: Touche) -> &mut Self {
        match touche {
            Touche::Chiffre(c) if !c.is_ascii_digit() => {
                self.erreur(Erreur::ActionInconnue(c.to_string()))
            }
            Touche::Chiffre(c) => self.transition(|s| s.caractere(&c.to_string())),

            Touche::Plus => self.transition(|s| s.binaire('+', "")),
            Touche::Moins => self.transition(|s| s.binaire('-', "")),
            Touche::Fois => self.transition(|s| s.binaire('×', "")),
            Touche::Divise => self.transition(|s| s.binaire('÷', "")),
            Touche::Puissance => self.transition(|s| s.binaire('^', "")),
            Touche::Carre => self.transition(|s| s.binaire('^', "2")),

            Touche::Parentheses => self.transition(Self::parentheses),
            Touche::Point => self.transition(Self::point),
            Touche::Virgule => self.transition(Self::virgule),
            Touche::Effacer => self.transition(Self::effacer),
            Touche::ToutEffacer => self.transition(Self::tout_effacer),
            Touche::Egal => self.egal_avec_format(Format::Fixe),

            Touche::Degres => self.transition(|s| s.unite("°")),
            Touche::Radians => self.transition(|s| s.unite("÷1°")),
            Touche::Factorielle => self.transition(|s| s.unite("!")),

            Touche::Racine => self.transition(|s| s.caractere("√")),
            Touche::Pi => self.transition(|s| s.caractere("π")),
            Touche::Euler => self.transition(|s| s.caractere("e")),
            Touche::EPuissance => self.transition(|s| s.caractere("e^")),
            Touche::DixPuissance => self.transition(|s| s.caractere("10^")),

            Touche::Appel(nom) => self.transition(|s| s.fonction(nom)),
        }
    }

    /// '=' avec un rendu choisi.
    pub fn egal_avec_format(&mut self, format: Format) -> &mut Self {
        self.transition(|s| s.egal(format))
    }

    /// Affiche "NaN" et retient `e`.
    pub fn erreur(&mut self, e: Erreur) -> &mut Self {
        self.echec(e);
        self.pret = false;
        self
    }

    /// Dernière erreur, effacée par la touche suivante.
    pub fn verifier(&self) -> Result<(), Erreur> {
        match &self.erreur {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }

    /// Annule l’évaluation en cours et toutes les suivantes de ce curseur.
    pub fn annuler(&self) {
        self.annulation.annuler();
    }

    /// Jeton partagé : `annuler()` depuis un autre thread interrompt l’évaluation.
    pub fn annulation(&self) -> Annulation {
        self.annulation.clone()
    }

    /* ---- transitions ---- */

    fn transition(&mut self, edition: impl FnOnce(&mut Self) -> Suite) -> &mut Self {
        self.preparer();
        if let Suite::Marqueur = edition(self) {
            self.texte.ajouter_car(CURSEUR);
        }
        self.pret = false;
        self
    }

    fn preparer(&mut self) {
        if self.pret {
            return;
        }

        if self.texte.dernier() == Some(CURSEUR) {
            self.texte.effacer_dernier();
        } else if self.texte.egale(NAN) {
            self.texte.vider();
        } else {
            // résultat affiché : on repart du dernier résultat
            self.texte = Saisie::new(ANS);
        }

        self.erreur = None;
        self.pret = true;
    }

    fn echec(&mut self, e: Erreur) -> Suite {
        self.erreur = Some(e);
        self.texte = Saisie::new(NAN);
        Suite::Nu
    }

    /// Chiffre, constante, √ ou préfixe ("e^", "10^"). × implicite derrière une valeur.
    fn caractere(&mut self, v: &str) -> Suite {
        let chiffre_seul = v.len() == 1 && v.starts_with(|c: char| c.is_ascii_digit());
        let t = &mut self.texte;

        if !chiffre_seul && t.finit_par(".") {
            t.effacer_dernier();
        }
        if t.finit_par(ANS)
            || est_un_de(t.dernier(), FIN_DE_VALEUR)
            || (est_chiffre(t.dernier()) && !chiffre_seul)
        {
            t.ajouter_car('×');
        }

        t.ajouter(v);
        Suite::Marqueur
    }

    fn binaire(&mut self, op: char, suffixe: &str) -> Suite {
        let t = &mut self.texte;
        if t.finit_par(".") {
            t.effacer_dernier();
        }

        if op == '-' {
            // '-' est aussi le signe : deux appuis font '+', un '+' sans opérande gauche disparaît
            if t.finit_par("-") {
                t.effacer_dernier();
                t.ajouter_car('+');
            } else {
                if t.finit_par("+") {
                    t.effacer_dernier();
                }
                t.ajouter_car('-');
            }

            if t.commence_par("+") {
                t.retirer_premier();
            }
            if t.finit_par("+") && est_un_de(t.penultieme(), "+×÷(^√,") {
                t.effacer_dernier();
            }
            return Suite::Marqueur;
        }

        // remplace l’opérateur précédent
        while est_un_de(t.dernier(), "-×÷+^") {
            t.effacer_dernier();
        }
        if finit_une_valeur(t) {
            t.ajouter_car(op);
            t.ajouter(suffixe);
        }
        Suite::Marqueur
    }

    fn fonction(&mut self, nom: &str) -> Suite {
        let t = &mut self.texte;
        if t.finit_par(".") {
            t.effacer_dernier();
        }
        if finit_une_valeur(t) {
            t.ajouter_car('×');
        }

        t.ajouter(nom);
        t.ajouter_car('(');
        Suite::Marqueur
    }

    /// ! ° ÷1° : seulement derrière une valeur.
    fn unite(&mut self, u: &str) -> Suite {
        let t = &mut self.texte;
        if t.finit_par(".") {
            t.effacer_dernier();
        }
        if finit_une_valeur(t) {
            t.ajouter(u);
        }
        Suite::Marqueur
    }

    fn parentheses(&mut self) -> Suite {
        let t = &mut self.texte;

        if t.est_vide() || est_un_de(t.dernier(), "(+-×÷√^,") {
            t.ajouter_car('(');
        } else if t.combien_ouvertes() > 0 && finit_une_valeur(t) {
            t.ajouter_car(')');
        } else {
            t.ajouter("×(");
        }
        Suite::Marqueur
    }

    fn point(&mut self) -> Suite {
        let t = &mut self.texte;
        if est_chiffre(t.dernier()) && !t.est_pointee() {
            t.ajouter_car('.');
        }
        Suite::Marqueur
    }

    /// Séparateur d’arguments dans un appel (gdc, lcm), point décimal ailleurs.
    fn virgule(&mut self) -> Suite {
        if !self.texte.dans_un_appel() {
            return self.point();
        }

        let t = &mut self.texte;
        if t.finit_par(".") {
            t.effacer_dernier();
        }
        if finit_une_valeur(t) {
            t.ajouter_car(',');
        }
        Suite::Marqueur
    }

    fn effacer(&mut self) -> Suite {
        if self.abandonner_fonction() {
            return Suite::Marqueur;
        }

        if self.texte.egale(ANS) {
            self.texte.vider();
        } else {
            self.texte.effacer_dernier();
        }
        Suite::Marqueur
    }

    fn tout_effacer(&mut self) -> Suite {
        self.texte.vider();
        Suite::Marqueur
    }

    /// Retire une ouverture vide "nom(" ou "(" avec l’opérateur qui la précède.
    /// "((" n’est pas concerné.
    fn abandonner_fonction(&mut self) -> bool {
        let t = &mut self.texte;
        if !t.finit_par("(") || t.penultieme() == Some('(') {
            return false;
        }

        t.effacer_dernier();
        while t.dernier().is_some_and(|c| c.is_ascii_alphabetic()) {
            t.effacer_dernier();
        }
        if est_un_de(t.dernier(), "+-×÷^") {
            t.effacer_dernier();
        }
        true
    }

    /// Complète puis évalue `save(texte)` ; texte vide : rien à faire.
    fn egal(&mut self, format: Format) -> Suite {
        let t = &mut self.texte;

        loop {
            let avant = t.len();
            while est_un_de(t.dernier(), "+-×÷.^√,") {
                t.effacer_dernier();
            }
            if t.finit_par("(") {
                while t.finit_par("(") {
                    t.effacer_dernier();
                }
                while t.dernier().is_some_and(|c| c.is_ascii_alphabetic()) {
                    t.effacer_dernier();
                }
            }
            if t.len() == avant {
                break;
            }
        }

        for _ in 0..t.combien_ouvertes().max(0) {
            t.ajouter_car(')');
        }
        if t.est_vide() {
            return Suite::Marqueur;
        }

        let expression = format!("save({t})");
        let annulation = self.annulation.prolonger(self.moteur.delai());
        match self.moteur.analyser_avec(&expression, &annulation) {
            Ok(v) => {
                self.texte = Saisie::new(&formater(&v, format));
                Suite::Nu
            }
            Err(e) => self.echec(e),
        }
    }
}

impl fmt::Display for Curseur {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.texte)
    }
}
