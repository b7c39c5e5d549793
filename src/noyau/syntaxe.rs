// src/noyau/syntaxe.rs
//
// Descente récursive : jetons -> Noeud
// ------------------------------------
// Du plus lâche au plus serré :
//   expr      := addsub
//   addsub    := muldiv (('+'|'-') muldiv)*          associatif à gauche
//   muldiv    := facteur (('*'|'/') facteur)*        associatif à gauche
//   facteur   := puissance ('!'|'°')*                postfixés, de gauche à droite
//   puissance := primaire ('^' puissance)?           associatif à droite
//   primaire  := '(' expr ')'
//              | '-' facteur                         => (0 - facteur)
//              | '√' facteur
//              | IDENT '(' (expr (',' expr)*)? ')'
//              | NOMBRE | IDENT
//
// Donc "6!°" = (6!)°, "x^y!" = (x^y)!, "2^3^2" = 2^(3^2).
// Le parseur ne consulte jamais le registre : l’arité est vérifiée à l’évaluation.
// Imbrication et hauteur d’arbre bornées par PROFONDEUR_MAX (sinon : erreur de syntaxe).

use super::arbre::{Noeud, PROFONDEUR_MAX};
use super::erreur::Erreur;
use super::jetons::{Jeton, Jetons};

struct Lecteur<'a> {
    jetons: &'a [Jeton],
    pos: usize,
    profondeur: usize,
}

fn trop_profonde() -> Erreur {
    Erreur::syntaxe("expression trop profonde")
}

fn borner(noeud: Noeud) -> Result<Noeud, Erreur> {
    if noeud.hauteur() > PROFONDEUR_MAX {
        return Err(trop_profonde());
    }
    Ok(noeud)
}

impl<'a> Lecteur<'a> {
    fn voir(&self) -> Option<&'a Jeton> {
        self.jetons.get(self.pos)
    }

    fn voir_est(&self, c: char) -> bool {
        self.voir().is_some_and(|j| j.est(c))
    }

    fn consommer(&mut self) -> Option<&'a Jeton> {
        let j = self.jetons.get(self.pos)?;
        self.pos += 1;
        Some(j)
    }

    fn expr(&mut self) -> Result<Noeud, Erreur> {
        self.addsub()
    }

    fn addsub(&mut self) -> Result<Noeud, Erreur> {
        let mut noeud = self.muldiv()?;
        while self.voir_est('+') || self.voir_est('-') {
            let op = self.consommer().map(Jeton::texte).unwrap_or_default();
            let droite = self.muldiv()?;
            noeud = borner(Noeud::binaire(op, noeud, droite))?;
        }
        Ok(noeud)
    }

    fn muldiv(&mut self) -> Result<Noeud, Erreur> {
        let mut noeud = self.facteur()?;
        while self.voir_est('*') || self.voir_est('/') {
            let op = self.consommer().map(Jeton::texte).unwrap_or_default();
            let droite = self.facteur()?;
            noeud = borner(Noeud::binaire(op, noeud, droite))?;
        }
        Ok(noeud)
    }

    fn facteur(&mut self) -> Result<Noeud, Erreur> {
        let mut noeud = self.puissance()?;
        while self.voir_est('!') || self.voir_est('°') {
            let op = self.consommer().map(Jeton::texte).unwrap_or_default();
            noeud = borner(Noeud::unaire(op, noeud))?;
        }
        Ok(noeud)
    }

    /// Toute récursion du parseur passe par ici : c’est là qu’on compte l’imbrication.
    fn puissance(&mut self) -> Result<Noeud, Erreur> {
        self.profondeur += 1;
        if self.profondeur > PROFONDEUR_MAX {
            return Err(trop_profonde());
        }

        let mut noeud = self.primaire()?;
        if self.voir_est('^') {
            self.consommer();
            let exposant = self.puissance()?;
            noeud = borner(Noeud::binaire("^", noeud, exposant))?;
        }

        self.profondeur -= 1;
        Ok(noeud)
    }

    fn primaire(&mut self) -> Result<Noeud, Erreur> {
        let jeton = self
            .consommer()
            .ok_or_else(|| Erreur::syntaxe("fin d’expression inattendue"))?;

        match jeton {
            Jeton::Ponctuation('(') => {
                let interieur = self.expr()?;
                self.fermer("parenthèse fermante manquante")?;
                Ok(interieur)
            }

            Jeton::Operateur('-') => {
                let operande = self.facteur()?;
                borner(Noeud::binaire("-", Noeud::feuille("0"), operande))
            }

            Jeton::Operateur('√') => borner(Noeud::unaire("√", self.facteur()?)),

            Jeton::Ident(nom) if self.voir_est('(') => {
                self.consommer();
                let args = self.arguments()?;
                borner(Noeud::appel(nom.clone(), args))
            }

            Jeton::Nombre(s) | Jeton::Ident(s) => Ok(Noeud::feuille(s.clone())),

            autre => Err(Erreur::syntaxe(format!(
                "jeton inattendu « {} »",
                autre.texte()
            ))),
        }
    }

    /// Après '(' : liste possiblement vide, séparée par ','.
    fn arguments(&mut self) -> Result<Vec<Noeud>, Erreur> {
        let mut args = Vec::new();
        if self.voir_est(')') {
            self.consommer();
            return Ok(args);
        }

        loop {
            args.push(self.expr()?);
            if self.voir_est(',') {
                self.consommer();
                continue;
            }
            self.fermer("parenthèse fermante manquante dans l’appel")?;
            return Ok(args);
        }
    }

    fn fermer(&mut self, msg: &str) -> Result<(), Erreur> {
        if self.voir_est(')') {
            self.consommer();
            Ok(())
        } else {
            Err(Erreur::syntaxe(msg))
        }
    }
}

/// Construit l’arbre. Tout jeton restant après l’expression (ex: ')' orpheline) est une erreur.
pub fn arbre(jetons: &Jetons) -> Result<Noeud, Erreur> {
    let mut c = Lecteur {
        jetons: &jetons.0,
        pos: 0,
        profondeur: 0,
    };

    let racine = c.expr()?;
    if let Some(reste) = c.voir() {
        return Err(Erreur::syntaxe(format!(
            "jeton inattendu « {} »",
            reste.texte()
        )));
    }

    Ok(racine)
}
