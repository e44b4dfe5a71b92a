// Extraction prompt template.
// The field list must stay in sync with `record::FIELD_NAMES`.

pub const EXTRACTION_PROMPT: &str = r#"
Lis et analyse le texte suivant issu d'un fichier: {doc_text}.
Extrait les champs suivants et retourne un dictionnaire JSON valide :

- Nom (chaîne de caractères)
- Prénom (chaîne de caractères)
- Nom de jeune fille (chaîne de caractères)
- Numéro d'employé (chaîne de caractères)
- Titre (chaîne de caractères, ex : « Ingénieur », « Développeur »)
- Date de naissance (chaîne, format JJ/MM/AAAA)
- Lieu de naissance (chaîne de caractères)
- Nationalité (chaîne de caractères)
- Sexe (chaîne de caractères, ex : « Homme », « Femme »)
- Situation familiale (chaîne de caractères, ex : « Célibataire », « Marié(e) »)
- Nombre d'enfants (entier)
- Numéro de sécurité sociale (chaîne de caractères)
- Adresse postale (chaîne de caractères)
- Code postal (chaîne de caractères)
- Adresse e-mail (chaîne de caractères)
- Numéro de téléphone (chaîne de caractères)
- Adresse (chaîne de caractères)

Assure-toi que la sortie est un JSON valide et rien d'autre.
Tout champ manquant → null (ou 0 pour l'entier) ; ne saute aucun champ.
"#;

const DOC_TEXT_PLACEHOLDER: &str = "{doc_text}";

/// Fills the single `{doc_text}` placeholder.
pub fn render_extraction_prompt(doc_text: &str) -> String {
    EXTRACTION_PROMPT.replacen(DOC_TEXT_PLACEHOLDER, doc_text, 1)
}
