use std::io::Write;

use cnlp_dict::{LoadMode, load_lemma_dictionary};
use cnlp_lemma::{LemmaSource, Lemmatizer, SnowballStemmer};
use tempfile::NamedTempFile;

const LEMMAS: &str = "\
liep|V|lopen
liepen|V|lopen
kranten|N|krant
mooiste|Adj|mooi
Bilbao|N|Bilbao
";

fn write_fixture() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(LEMMAS.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn lemmatizes_against_loaded_file() {
    let file = write_fixture();
    let lemmatizer = Lemmatizer::dutch();
    for mode in [LoadMode::Mmap, LoadMode::Owned] {
        let dict = load_lemma_dictionary(file.path(), mode).unwrap();
        assert_eq!(dict.len(), 5);

        let lemma = lemmatizer.lemmatize("liepen/V", &dict);
        assert_eq!(lemma.text, "lopen");
        assert_eq!(lemma.source, LemmaSource::Dictionary);

        assert_eq!(lemmatizer.lemmatize("Bilbao/N", &dict).text, "Bilbao");
        assert_eq!(lemmatizer.lemmatize("mooiste/Adj", &dict).text, "mooi");
    }
}

#[test]
fn tag_decides_between_stemming_and_surface() {
    let file = write_fixture();
    let dict = load_lemma_dictionary(file.path(), LoadMode::Owned).unwrap();
    let lemmatizer = Lemmatizer::dutch();
    let snowball = SnowballStemmer::dutch();

    // the key includes the tag, so an untagged word misses the dictionary
    let lemma = lemmatizer.lemmatize("kranten", &dict);
    assert_eq!(lemma.source, LemmaSource::Stemmed);
    assert_eq!(lemma.text, snowball.stem("kranten"));

    let lemma = lemmatizer.lemmatize("kranten/Prep", &dict);
    assert_eq!(lemma.source, LemmaSource::FunctionWord);
    assert_eq!(lemma.text, "kranten");

    let lemma = lemmatizer.lemmatize("wandelingen/N", &dict);
    assert_eq!(lemma.source, LemmaSource::Stemmed);
    assert_eq!(lemma.text, snowball.stem("wandelingen"));
}
