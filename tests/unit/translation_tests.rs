/*!
 * Tests for the batching translator using mock providers
 */

use std::sync::Arc;

use srtinterp::language_utils::TargetLanguage;
use srtinterp::subtitle::{SubtitleEntry, TimeStamp};
use srtinterp::translation::{MockProvider, TranslationCache, Translator};

use crate::common::{create_temp_dir, generate_srt, init_logging, parse_srt, SAMPLE_SRT};

fn entry(index: usize, lines: &[&str]) -> SubtitleEntry {
    let start = (index as u64) * 1000;
    SubtitleEntry::new(
        index,
        TimeStamp::from_millis(start).unwrap(),
        TimeStamp::from_millis(start + 500).unwrap(),
        lines.iter().map(|l| l.to_string()).collect(),
    )
    .unwrap()
}

#[tokio::test]
async fn test_translateEntries_withEnglishTarget_shouldNotCallProvider() {
    let provider = Arc::new(MockProvider::working());
    let translator = Translator::new(provider.clone(), TargetLanguage::English);
    let entries = parse_srt(SAMPLE_SRT);

    let result = translator.translate_entries(entries.clone(), Some(SAMPLE_SRT)).await;

    assert_eq!(result, entries);
    assert_eq!(provider.request_count(), 0);
}

#[tokio::test]
async fn test_translateEntries_withWorkingProvider_shouldReplaceEveryLine() {
    init_logging();
    let provider = Arc::new(MockProvider::working());
    let translator = Translator::new(provider.clone(), TargetLanguage::Korean);
    let entries = parse_srt(SAMPLE_SRT);

    let result = translator.translate_entries(entries.clone(), None).await;

    assert_eq!(result.len(), entries.len());
    assert_eq!(result[1].lines(), ["[ko] It contains", "[ko] multiple lines."]);
    for (translated, original) in result.iter().zip(&entries) {
        assert_eq!(translated.index(), original.index());
        assert_eq!(translated.start(), original.start());
        assert_eq!(translated.end(), original.end());
        assert_eq!(translated.lines().len(), original.lines().len());
    }
    assert_eq!(provider.request_count(), 4);
}

#[tokio::test]
async fn test_translateEntries_shouldTrimLinesAndKeepBlankOnes() {
    let translator = Translator::new(Arc::new(MockProvider::working()), TargetLanguage::Chinese);
    let entries = vec![entry(1, &["  Hello  ", "", "World"])];

    let result = translator.translate_entries(entries, None).await;

    assert_eq!(result[0].lines(), ["[zh-CN] Hello", "", "[zh-CN] World"]);
}

#[tokio::test]
async fn test_translateEntries_withIntermittentFailure_shouldFallBackPerBatch() {
    init_logging();
    let translator = Translator::new(Arc::new(MockProvider::intermittent(2)), TargetLanguage::Japanese)
        .with_batch_size(1)
        .with_concurrency(1);
    let entries = vec![entry(1, &["one"]), entry(2, &["two"]), entry(3, &["three"])];

    let result = translator.translate_entries(entries, None).await;

    assert_eq!(result[0].text(), "[ja] one");
    assert_eq!(result[1].text(), "two");
    assert_eq!(result[2].text(), "[ja] three");
}

#[tokio::test]
async fn test_translateEntries_withFailingProvider_shouldKeepOriginals() {
    let translator = Translator::new(Arc::new(MockProvider::failing()), TargetLanguage::Filipino).with_batch_size(2);
    let entries = parse_srt(&generate_srt(5));

    let result = translator.translate_entries(entries.clone(), None).await;

    assert_eq!(result, entries);
}

#[tokio::test]
async fn test_translateEntries_withEmptyTranslations_shouldKeepOriginals() {
    let translator = Translator::new(Arc::new(MockProvider::empty()), TargetLanguage::Korean);
    let entries = vec![entry(1, &["Hello"])];

    let result = translator.translate_entries(entries.clone(), None).await;

    assert_eq!(result, entries);
}

#[tokio::test]
async fn test_translateEntries_withCache_shouldSkipProviderOnSecondRun() {
    let temp_dir = create_temp_dir().unwrap();
    let cache = TranslationCache::new(temp_dir.path());
    let entries = parse_srt(SAMPLE_SRT);

    let first = Translator::new(Arc::new(MockProvider::working()), TargetLanguage::Korean).with_cache(cache.clone());
    let translated = first.translate_entries(entries.clone(), Some(SAMPLE_SRT)).await;
    assert!(cache.cache_file(SAMPLE_SRT, TargetLanguage::Korean).exists());

    let offline = Arc::new(MockProvider::failing());
    let second = Translator::new(offline.clone(), TargetLanguage::Korean).with_cache(cache.clone());
    let cached = second.translate_entries(entries, Some(SAMPLE_SRT)).await;

    assert_eq!(cached, translated);
    assert_eq!(offline.request_count(), 0);
    assert_eq!(cache.stats(), (1, 1));
}
