// src/noyau/jetons.rs
//
// Tokenisation : texte brut -> suite ordonnée de jetons.
// Ne échoue jamais : un caractère inconnu est ignoré (après avoir vidé le jeton en cours).

use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Jeton {
    /// Suite de chiffres avec au plus un point décimal ("2.5", "10856.", ".5").
    Nombre(String),
    /// [a-zA-Z_][a-zA-Z0-9_]* (fonctions, variables, constantes).
    Ident(String),
    /// + - * / ! √ ^ °
    Operateur(char),
    /// ( ) ,
    Ponctuation(char),
}

impl Jeton {
    pub fn texte(&self) -> String {
        match self {
            Jeton::Nombre(s) | Jeton::Ident(s) => s.clone(),
            Jeton::Operateur(c) | Jeton::Ponctuation(c) => c.to_string(),
        }
    }

    pub fn est(&self, c: char) -> bool {
        matches!(self, Jeton::Operateur(x) | Jeton::Ponctuation(x) if *x == c)
    }
}

const OPERATEURS: &str = "+-*/!√^°";
const PONCTUATION: &str = "(),";

/// Suite ordonnée de jetons (l’ordre est significatif).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Jetons(pub Vec<Jeton>);

impl Jetons {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Jeton> {
        self.0.iter()
    }

    /// Compare le texte des jetons à la liste donnée.
    pub fn compare(&self, autres: &[&str]) -> bool {
        self.len() == autres.len() && self.iter().zip(autres).all(|(j, a)| j.texte() == *a)
    }
}

impl fmt::Display for Jetons {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let textes: Vec<String> = self.iter().map(Jeton::texte).collect();
        write!(f, "{}", textes.join(" "))
    }
}

/// Jeton en cours d’accumulation.
enum EnCours {
    Rien,
    Nombre(String),
    Ident(String),
}

impl EnCours {
    fn vider(&mut self, out: &mut Vec<Jeton>) {
        match std::mem::replace(self, EnCours::Rien) {
            EnCours::Rien => {}
            EnCours::Nombre(s) => out.push(Jeton::Nombre(s)),
            EnCours::Ident(s) => out.push(Jeton::Ident(s)),
        }
    }
}

/// Tokenize une chaîne.
/// - espaces ignorés
/// - nombres : chiffres + un seul '.' (un second '.' ouvre un nouveau nombre)
/// - identifiants : lettres/underscore, chiffres acceptés à la suite ("x2")
/// - un nombre en cours est vidé avant une lettre : "3x" -> 3, x
/// - opérateurs/ponctuation : un caractère chacun
pub fn tokenize(s: &str) -> Jetons {
    let mut out = Vec::new();
    let mut en_cours = EnCours::Rien;

    for c in s.chars() {
        if c.is_whitespace() {
            continue;
        }

        if c.is_ascii_digit() {
            if let EnCours::Nombre(n) | EnCours::Ident(n) = &mut en_cours {
                n.push(c);
            } else {
                en_cours = EnCours::Nombre(c.to_string());
            }
            continue;
        }

        if c == '.' {
            if let EnCours::Nombre(n) = &mut en_cours {
                if !n.contains('.') {
                    n.push(c);
                    continue;
                }
            }
            en_cours.vider(&mut out);
            en_cours = EnCours::Nombre(c.to_string());
            continue;
        }

        if c.is_ascii_alphabetic() || c == '_' {
            if let EnCours::Ident(n) = &mut en_cours {
                n.push(c);
                continue;
            }
            en_cours.vider(&mut out);
            en_cours = EnCours::Ident(c.to_string());
            continue;
        }

        en_cours.vider(&mut out);
        if OPERATEURS.contains(c) {
            out.push(Jeton::Operateur(c));
        } else if PONCTUATION.contains(c) {
            out.push(Jeton::Ponctuation(c));
        }
        // sinon : caractère inconnu, ignoré
    }
    en_cours.vider(&mut out);

    Jetons(out)
}
