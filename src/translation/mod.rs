/*!
 * Translation of subtitle text before playback.
 *
 * - `provider`: the `TranslationProvider` trait
 * - `google`: HTTP client for the public Google Translate endpoint
 * - `mock`: scripted provider for tests
 * - `cache`: content-addressed file cache of translated files
 * - `translator`: batching and fallback logic
 */

pub mod cache;
pub mod google;
pub mod mock;
pub mod provider;
pub mod translator;

pub use self::cache::TranslationCache;
pub use self::google::GoogleTranslateProvider;
pub use self::mock::{MockBehavior, MockProvider};
pub use self::provider::TranslationProvider;
pub use self::translator::Translator;
