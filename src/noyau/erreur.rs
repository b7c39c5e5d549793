// src/noyau/erreur.rs
//
// Taxonomie d’erreurs du noyau + du curseur.
// Les erreurs du parseur/évaluateur remontent telles quelles jusqu’à l’appelant de Moteur.

use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Erreur {
    /// Fin d’entrée inattendue, parenthèse non appariée, jeton inattendu.
    #[error("erreur de syntaxe : {0}")]
    Syntaxe(String),

    /// Jeton nu qui n’est ni variable, ni constante, ni nombre.
    #[error("symbole indéfini : {0}")]
    SymboleIndefini(String),

    #[error("{nom} attend {attendu} argument(s), reçu {recu}")]
    Arite {
        nom: String,
        attendu: usize,
        recu: usize,
    },

    /// Factorielle négative/non entière, √ négative, division par zéro, 0^0, ...
    #[error("hors domaine : {0}")]
    Domaine(String),

    /// Échéance dépassée ou annulation explicite.
    #[error("évaluation annulée")]
    Annulee,

    #[error("action inconnue : {0}")]
    ActionInconnue(String),

    #[error("cellule mémoire : {0}")]
    Memoire(String),
}

impl Erreur {
    pub fn syntaxe(msg: impl Into<String>) -> Self {
        Erreur::Syntaxe(msg.into())
    }

    pub fn domaine(msg: impl Into<String>) -> Self {
        Erreur::Domaine(msg.into())
    }
}
