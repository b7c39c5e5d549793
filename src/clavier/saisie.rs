// src/clavier/saisie.rs
//
// Tampon d’édition : une suite de caractères Unicode (× ÷ π √ ° sont des caractères uniques).
// Toutes les opérations sont sans échec : effacer un tampon vide ne fait rien.

use std::fmt;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Saisie(Vec<char>);

impl Saisie {
    pub fn new(texte: &str) -> Self {
        Saisie(texte.chars().collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn est_vide(&self) -> bool {
        self.0.is_empty()
    }

    pub fn ajouter(&mut self, texte: &str) {
        self.0.extend(texte.chars());
    }

    pub fn ajouter_car(&mut self, c: char) {
        self.0.push(c);
    }

    /// Retire le dernier caractère.
    pub fn effacer_dernier(&mut self) {
        self.0.pop();
    }

    /// Retire le premier caractère.
    pub fn retirer_premier(&mut self) {
        if !self.0.is_empty() {
            self.0.remove(0);
        }
    }

    pub fn vider(&mut self) {
        self.0.clear();
    }

    pub fn premier(&self) -> Option<char> {
        self.0.first().copied()
    }

    pub fn dernier(&self) -> Option<char> {
        self.0.last().copied()
    }

    /// Avant-dernier caractère.
    pub fn penultieme(&self) -> Option<char> {
        self.0.len().checked_sub(2).map(|i| self.0[i])
    }

    pub fn commence_par(&self, texte: &str) -> bool {
        let mut it = self.0.iter();
        texte.chars().all(|c| it.next() == Some(&c))
    }

    pub fn finit_par(&self, texte: &str) -> bool {
        let mut it = self.0.iter().rev();
        texte.chars().rev().all(|c| it.next() == Some(&c))
    }

    pub fn egale(&self, texte: &str) -> bool {
        self.0.iter().copied().eq(texte.chars())
    }

    /// Parenthèses ouvertes non fermées (peut être négatif si le tampon est incohérent).
    pub fn combien_ouvertes(&self) -> isize {
        self.0.iter().fold(0, |n, c| match c {
            '(' => n + 1,
            ')' => n - 1,
            _ => n,
        })
    }

    /// Le nombre en cours de frappe contient-il déjà un point ?
    pub fn est_pointee(&self) -> bool {
        self.0
            .iter()
            .rev()
            .take_while(|c| c.is_ascii_digit() || **c == '.')
            .any(|c| *c == '.')
    }

    /// La '(' ouverte la plus intérieure suit-elle un nom de fonction ?
    pub fn dans_un_appel(&self) -> bool {
        let mut profondeur = 0usize;
        for (i, c) in self.0.iter().enumerate().rev() {
            match c {
                ')' => profondeur += 1,
                '(' if profondeur > 0 => profondeur -= 1,
                '(' => return i > 0 && self.0[i - 1].is_ascii_alphabetic(),
                _ => {}
            }
        }
        false
    }
}

impl fmt::Display for Saisie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.iter().try_for_each(|c| write!(f, "{c}"))
    }
}

/// `c` fait partie de `ensemble` (faux si absent).
pub fn est_un_de(c: Option<char>, ensemble: &str) -> bool {
    c.is_some_and(|c| ensemble.contains(c))
}

pub fn est_chiffre(c: Option<char>) -> bool {
    c.is_some_and(|c| c.is_ascii_digit())
}
