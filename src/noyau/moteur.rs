// src/noyau/moteur.rs
//
// Moteur d’expressions : registre nommé (constantes, variables, fonctions),
// remplacements textuels, puis remplacer -> tokenize -> arbre -> évaluer.
//
// Un registre construit n’est plus modifié pendant une évaluation :
// plusieurs évaluations concurrentes peuvent partager le même Moteur.

use num_rational::BigRational;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use super::annulation::Annulation;
use super::calcul::{rationnel_depuis_f64, vers_f64};
use super::erreur::Erreur;
use super::eval::evaluer;
use super::jetons::tokenize;
use super::syntaxe::arbre;

/// Précision par défaut des calculs non exacts (π, e, √, °).
pub const CHIFFRES_DEFAUT: usize = 40;
pub const CHIFFRES_MAX: usize = 200;
/// Échéance par défaut d’une évaluation.
pub const DELAI_DEFAUT: Duration = Duration::from_secs(60);

/// Variable : relue à chaque évaluation.
pub type Accesseur = Arc<dyn Fn() -> BigRational + Send + Sync>;

/// Forme normalisée de toute fonction enregistrée (arité déjà vérifiée à l’intérieur).
/// Le jeton d’annulation de l’évaluation en cours est transmis à chaque appel.
pub type Appel =
    Arc<dyn Fn(&[BigRational], &Annulation) -> Result<BigRational, Erreur> + Send + Sync>;

/* ------------------------ Fonctions ------------------------ */

type F0 = Box<dyn Fn() -> Result<BigRational, Erreur> + Send + Sync>;
type F1 = Box<dyn Fn(&BigRational) -> Result<BigRational, Erreur> + Send + Sync>;
type F2 = Box<dyn Fn(&BigRational, &BigRational) -> Result<BigRational, Erreur> + Send + Sync>;
type FN = Box<dyn Fn(&[BigRational]) -> Result<BigRational, Erreur> + Send + Sync>;
type F2A = Box<
    dyn Fn(&BigRational, &BigRational, &Annulation) -> Result<BigRational, Erreur> + Send + Sync,
>;

/// Formes acceptées à l’enregistrement.
pub enum Fonction {
    Zero(F0),
    Une(F1),
    Deux(F2),
    Variadique(FN),
    /// Deux arguments + jeton d’annulation (boucles longues : pgcd, ppcm).
    DeuxAnnulable(F2A),
}

impl Fonction {
    pub fn zero(f: impl Fn() -> Result<BigRational, Erreur> + Send + Sync + 'static) -> Self {
        Fonction::Zero(Box::new(f))
    }

    pub fn une(
        f: impl Fn(&BigRational) -> Result<BigRational, Erreur> + Send + Sync + 'static,
    ) -> Self {
        Fonction::Une(Box::new(f))
    }

    pub fn deux(
        f: impl Fn(&BigRational, &BigRational) -> Result<BigRational, Erreur> + Send + Sync + 'static,
    ) -> Self {
        Fonction::Deux(Box::new(f))
    }

    pub fn deux_annulable(
        f: impl Fn(&BigRational, &BigRational, &Annulation) -> Result<BigRational, Erreur>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        Fonction::DeuxAnnulable(Box::new(f))
    }

    pub fn variadique(
        f: impl Fn(&[BigRational]) -> Result<BigRational, Erreur> + Send + Sync + 'static,
    ) -> Self {
        Fonction::Variadique(Box::new(f))
    }

    /// f64 -> f64 (sin, cos, ...). Le pont passe par l’écriture décimale la plus courte.
    pub fn reelle(f: fn(f64) -> f64) -> Self {
        Self::reelle_partielle(move |x| Ok(f(x)))
    }

    /// f64 -> f64 avec domaine (arcsin, log, ...).
    pub fn reelle_partielle(
        f: impl Fn(f64) -> Result<f64, Erreur> + Send + Sync + 'static,
    ) -> Self {
        Self::une(move |x| rationnel_depuis_f64(f(vers_f64(x)?)?))
    }

    pub fn reelle2(f: fn(f64, f64) -> f64) -> Self {
        Self::reelle2_partielle(move |x, y| Ok(f(x, y)))
    }

    pub fn reelle2_partielle(
        f: impl Fn(f64, f64) -> Result<f64, Erreur> + Send + Sync + 'static,
    ) -> Self {
        Self::deux(move |x, y| rationnel_depuis_f64(f(vers_f64(x)?, vers_f64(y)?)?))
    }

    /// Uniformise en f(&[args], &annulation) avec contrôle d’arité.
    fn normaliser(self, nom: &str) -> Appel {
        let nom = nom.to_string();
        let arite = move |attendu: usize, recu: usize| Erreur::Arite {
            nom: nom.clone(),
            attendu,
            recu,
        };

        match self {
            Fonction::Zero(f) => Arc::new(move |args: &[BigRational], _: &Annulation| match args {
                [] => f(),
                _ => Err(arite(0, args.len())),
            }),
            Fonction::Une(f) => Arc::new(move |args: &[BigRational], _: &Annulation| match args {
                [x] => f(x),
                _ => Err(arite(1, args.len())),
            }),
            Fonction::Deux(f) => Arc::new(move |args: &[BigRational], _: &Annulation| match args {
                [x, y] => f(x, y),
                _ => Err(arite(2, args.len())),
            }),
            Fonction::DeuxAnnulable(f) => {
                Arc::new(move |args: &[BigRational], a: &Annulation| match args {
                    [x, y] => f(x, y, a),
                    _ => Err(arite(2, args.len())),
                })
            }
            Fonction::Variadique(f) => {
                Arc::new(move |args: &[BigRational], _: &Annulation| f(args))
            }
        }
    }
}

/* ------------------------ Réglages ------------------------ */

/// Options de construction, appliquées dans l’ordre (la dernière l’emporte).
pub enum Reglage {
    Constante(String, BigRational),
    Variable(String, Accesseur),
    Fonction(String, Fonction),
    /// Remplacement textuel sur mot entier, avant tokenisation.
    Remplacement(String, String),
    Remplacements(Vec<(String, String)>),
    /// Chiffres décimaux pour π, e, √ irrationnelles et °.
    Precision(usize),
    Delai(Duration),
}

impl Reglage {
    pub fn constante(nom: impl Into<String>, valeur: BigRational) -> Self {
        Reglage::Constante(nom.into(), valeur)
    }

    pub fn variable(
        nom: impl Into<String>,
        lire: impl Fn() -> BigRational + Send + Sync + 'static,
    ) -> Self {
        Reglage::Variable(nom.into(), Arc::new(lire))
    }

    pub fn fonction(nom: impl Into<String>, f: Fonction) -> Self {
        Reglage::Fonction(nom.into(), f)
    }

    pub fn remplacement(de: impl Into<String>, vers: impl Into<String>) -> Self {
        Reglage::Remplacement(de.into(), vers.into())
    }

    pub fn remplacements(paires: &[(&str, &str)]) -> Self {
        Reglage::Remplacements(
            paires
                .iter()
                .map(|(de, vers)| (de.to_string(), vers.to_string()))
                .collect(),
        )
    }
}

/* ------------------------ Registre ------------------------ */

#[derive(Clone)]
pub struct Registre {
    constantes: HashMap<String, BigRational>,
    variables: HashMap<String, Accesseur>,
    fonctions: HashMap<String, Appel>,
    remplacements: Vec<(String, String)>,
    chiffres: usize,
}

impl Default for Registre {
    fn default() -> Self {
        Self {
            constantes: HashMap::new(),
            variables: HashMap::new(),
            fonctions: HashMap::new(),
            remplacements: Vec::new(),
            chiffres: CHIFFRES_DEFAUT,
        }
    }
}

impl Registre {
    pub fn constante(&self, nom: &str) -> Option<&BigRational> {
        self.constantes.get(nom)
    }

    pub fn variable(&self, nom: &str) -> Option<&Accesseur> {
        self.variables.get(nom)
    }

    pub fn fonction(&self, nom: &str) -> Option<&Appel> {
        self.fonctions.get(nom)
    }

    pub fn chiffres(&self) -> usize {
        self.chiffres
    }

    fn remplacer(&mut self, de: String, vers: String) {
        match self.remplacements.iter().position(|(d, _)| *d == de) {
            Some(i) => self.remplacements[i].1 = vers,
            None => self.remplacements.push((de, vers)),
        }
    }

    /// Applique tous les remplacements, dans l’ordre d’insertion.
    pub fn appliquer_remplacements(&self, texte: &str) -> String {
        self.remplacements
            .iter()
            .fold(texte.to_string(), |acc, (de, vers)| remplacer_mot(&acc, de, vers))
    }
}

fn est_mot(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Remplace `de` par `vers` seulement là où `de` forme un mot entier :
/// un bord de `de` fait de caractères de mot ne doit pas toucher un autre caractère de mot.
/// "e" -> "E" touche "2×e^2" mais pas "save(".
fn remplacer_mot(texte: &str, de: &str, vers: &str) -> String {
    if de.is_empty() {
        return texte.to_string();
    }

    let mut out = String::with_capacity(texte.len());
    let mut reste = texte;
    let mut avant: Option<char> = None;

    while let Some(i) = reste.find(de) {
        let precedent = reste[..i].chars().next_back().or(avant);
        let suivant = reste[i + de.len()..].chars().next();

        let debut_libre = !de.starts_with(est_mot) || !precedent.is_some_and(est_mot);
        let fin_libre = !de.ends_with(est_mot) || !suivant.is_some_and(est_mot);

        out.push_str(&reste[..i]);
        if debut_libre && fin_libre {
            out.push_str(vers);
        } else {
            out.push_str(de);
        }

        avant = de.chars().next_back();
        reste = &reste[i + de.len()..];
    }

    out.push_str(reste);
    out
}

/* ------------------------ Moteur ------------------------ */

/// Étapes intermédiaires d’une évaluation (diagnostic).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Demarche {
    pub remplacee: String,
    pub jetons: String,
    pub arbre: String,
}

impl fmt::Display for Demarche {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "texte  : {}", self.remplacee)?;
        writeln!(f, "jetons : {}", self.jetons)?;
        write!(f, "arbre  : {}", self.arbre)
    }
}

#[derive(Clone)]
pub struct Moteur {
    registre: Registre,
    delai: Duration,
}

impl Default for Moteur {
    fn default() -> Self {
        Self {
            registre: Registre::default(),
            delai: DELAI_DEFAUT,
        }
    }
}

impl Moteur {
    pub fn new(reglages: impl IntoIterator<Item = Reglage>) -> Self {
        let mut m = Self::default();
        m.appliquer(reglages);
        m
    }

    /// Ajoute/écrase des entrées. Ne pas appeler pendant une évaluation (prend &mut).
    pub fn appliquer(&mut self, reglages: impl IntoIterator<Item = Reglage>) {
        let r = &mut self.registre;
        for reglage in reglages {
            match reglage {
                Reglage::Constante(nom, v) => {
                    r.constantes.insert(nom, v);
                }
                Reglage::Variable(nom, lire) => {
                    r.variables.insert(nom, lire);
                }
                Reglage::Fonction(nom, f) => {
                    let appel = f.normaliser(&nom);
                    r.fonctions.insert(nom, appel);
                }
                Reglage::Remplacement(de, vers) => r.remplacer(de, vers),
                Reglage::Remplacements(paires) => {
                    for (de, vers) in paires {
                        r.remplacer(de, vers);
                    }
                }
                Reglage::Precision(chiffres) => r.chiffres = chiffres.clamp(1, CHIFFRES_MAX),
                Reglage::Delai(delai) => self.delai = delai,
            }
        }
    }

    pub fn registre(&self) -> &Registre {
        &self.registre
    }

    pub fn delai(&self) -> Duration {
        self.delai
    }

    pub fn constante(&self, nom: &str) -> Option<BigRational> {
        self.registre.constante(nom).cloned()
    }

    /// Valeur courante de la variable (l’accesseur est appelé).
    pub fn variable(&self, nom: &str) -> Option<BigRational> {
        self.registre.variable(nom).map(|lire| lire())
    }

    pub fn fonction(&self, nom: &str) -> Option<Appel> {
        self.registre.fonction(nom).cloned()
    }

    /// Évalue avec l’échéance par défaut du moteur.
    pub fn analyser(&self, texte: &str) -> Result<BigRational, Erreur> {
        self.analyser_avec(texte, &Annulation::avec_delai(self.delai))
    }

    pub fn analyser_avec(
        &self,
        texte: &str,
        annulation: &Annulation,
    ) -> Result<BigRational, Erreur> {
        self.analyser_avec_demarche(texte, annulation)
            .map(|(v, _)| v)
    }

    /// Comme `analyser_avec`, en gardant les étapes intermédiaires.
    pub fn analyser_avec_demarche(
        &self,
        texte: &str,
        annulation: &Annulation,
    ) -> Result<(BigRational, Demarche), Erreur> {
        let remplacee = self.registre.appliquer_remplacements(texte);
        let jetons = tokenize(&remplacee);
        let racine = arbre(&jetons)?;

        let demarche = Demarche {
            jetons: jetons.to_string(),
            arbre: racine.to_string(),
            remplacee,
        };

        let valeur = evaluer(&racine, &self.registre, annulation)?;
        Ok((valeur, demarche))
    }
}
