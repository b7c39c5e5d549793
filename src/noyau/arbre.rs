// src/noyau/arbre.rs
//
// Arbre binaire possédé (pas de partage, pas de cycle).
// - feuille : gauche et droite absents
// - appel de fonction : valeur = nom, gauche = chaîne d’arguments
//   (chaque maillon : gauche = argument, droite = maillon suivant)
// - opérateur unaire postfixé (! °) et √ : seul `gauche` est présent

use std::fmt;

/// Valeur des maillons de la liste d’arguments.
pub const MAILLON: &str = "";

/// Hauteur maximale d’un arbre (et imbrication maximale au parseur).
/// Parcours, affichage et destruction sont récursifs : au-delà, la pile ne suffit plus.
pub const PROFONDEUR_MAX: usize = 256;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Noeud {
    pub valeur: String,
    pub gauche: Option<Box<Noeud>>,
    pub droite: Option<Box<Noeud>>,
    hauteur: usize,
}

fn hauteur(n: &Option<Box<Noeud>>) -> usize {
    n.as_deref().map_or(0, Noeud::hauteur)
}

impl Noeud {
    pub fn feuille(valeur: impl Into<String>) -> Self {
        Self {
            valeur: valeur.into(),
            gauche: None,
            droite: None,
            hauteur: 1,
        }
    }

    pub fn unaire(valeur: impl Into<String>, operande: Noeud) -> Self {
        Self {
            valeur: valeur.into(),
            hauteur: operande.hauteur + 1,
            gauche: Some(Box::new(operande)),
            droite: None,
        }
    }

    pub fn binaire(valeur: impl Into<String>, gauche: Noeud, droite: Noeud) -> Self {
        Self {
            valeur: valeur.into(),
            hauteur: gauche.hauteur.max(droite.hauteur) + 1,
            gauche: Some(Box::new(gauche)),
            droite: Some(Box::new(droite)),
        }
    }

    /// Appel : les arguments sont chaînés de droite à gauche.
    pub fn appel(nom: impl Into<String>, args: Vec<Noeud>) -> Self {
        let mut chaine: Option<Box<Noeud>> = None;
        for arg in args.into_iter().rev() {
            chaine = Some(Box::new(Noeud {
                valeur: MAILLON.to_string(),
                hauteur: arg.hauteur.max(hauteur(&chaine)) + 1,
                gauche: Some(Box::new(arg)),
                droite: chaine,
            }));
        }

        Self {
            valeur: nom.into(),
            hauteur: hauteur(&chaine) + 1,
            gauche: chaine,
            droite: None,
        }
    }

    /// Nombre de niveaux, feuille comprise (maillons d’arguments inclus).
    pub fn hauteur(&self) -> usize {
        self.hauteur
    }

    pub fn est_feuille(&self) -> bool {
        self.gauche.is_none() && self.droite.is_none()
    }

    /// Un nom d’identifiant avec des enfants = appel de fonction.
    pub fn est_appel(&self) -> bool {
        !self.est_feuille() && est_identifiant(&self.valeur)
    }

    /// Arguments d’un appel, de gauche à droite.
    pub fn arguments(&self) -> Arguments<'_> {
        Arguments {
            maillon: self.gauche.as_deref(),
        }
    }
}

pub(crate) fn est_identifiant(s: &str) -> bool {
    s.chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
}

/// Parcours de la chaîne d’arguments.
pub struct Arguments<'a> {
    maillon: Option<&'a Noeud>,
}

impl<'a> Iterator for Arguments<'a> {
    type Item = &'a Noeud;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let m = self.maillon?;
            self.maillon = m.droite.as_deref();
            if let Some(arg) = m.gauche.as_deref() {
                return Some(arg);
            }
        }
    }
}

/// Forme entièrement parenthésée (démarche).
impl fmt::Display for Noeud {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.est_feuille() {
            return write!(f, "{}", self.valeur);
        }

        if self.est_appel() {
            let args: Vec<String> = self.arguments().map(|a| a.to_string()).collect();
            return write!(f, "{}({})", self.valeur, args.join(", "));
        }

        match (self.gauche.as_deref(), self.droite.as_deref()) {
            (Some(g), Some(d)) => write!(f, "({g} {} {d})", self.valeur),
            (Some(g), None) if self.valeur == "√" => write!(f, "√({g})"),
            (Some(g), None) => write!(f, "({g}){}", self.valeur),
            (None, Some(d)) => write!(f, "{}({d})", self.valeur),
            (None, None) => write!(f, "{}", self.valeur),
        }
    }
}
