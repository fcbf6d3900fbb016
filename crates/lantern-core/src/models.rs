//! Registry of the embedding models the Lantern extras extension can run.
//!
//! Keys are stable symbolic names (`BAAI_BGE_BASE_EN`); renaming one breaks
//! every caller. Lookups fail closed: an unknown key is an error, never a
//! default model.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::LanternError;

/// The four disjoint key namespaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelNamespace {
    Text,
    Image,
    OpenAi,
    Cohere,
}

impl ModelNamespace {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelNamespace::Text => "text",
            ModelNamespace::Image => "image",
            ModelNamespace::OpenAi => "openai",
            ModelNamespace::Cohere => "cohere",
        }
    }
}

impl fmt::Display for ModelNamespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

macro_rules! key_serde {
    ($ty:ident) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.key())
            }
        }

        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.key())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let key = String::deserialize(deserializer)?;
                key.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

macro_rules! model_enum {
    (
        $(#[$meta:meta])*
        $ty:ident, $namespace:expr, {
            $($variant:ident => ($key:literal, $name:literal, $dims:literal),)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $ty {
            $($variant,)+
        }

        impl $ty {
            /// Every model in this namespace, in declaration order.
            pub const ALL: &'static [$ty] = &[$($ty::$variant,)+];

            /// Stable symbolic key.
            pub fn key(&self) -> &'static str {
                match self {
                    $($ty::$variant => $key,)+
                }
            }

            /// Identifier the extension expects as the model argument.
            pub fn model_name(&self) -> &'static str {
                match self {
                    $($ty::$variant => $name,)+
                }
            }

            /// Native output dimensionality of the model.
            pub fn dimensions(&self) -> u32 {
                match self {
                    $($ty::$variant => $dims,)+
                }
            }

            fn from_key(key: &str) -> Option<Self> {
                match key {
                    $($key => Some($ty::$variant),)+
                    _ => None,
                }
            }
        }

        impl FromStr for $ty {
            type Err = LanternError;

            fn from_str(key: &str) -> Result<Self, Self::Err> {
                Self::from_key(key).ok_or_else(|| LanternError::UnknownModel {
                    namespace: $namespace,
                    key: key.to_string(),
                })
            }
        }

        key_serde!($ty);
    };
}

macro_rules! provider_enum {
    (
        $(#[$meta:meta])*
        $ty:ident, $namespace:expr, {
            $($variant:ident => ($key:literal, $text:ident),)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $ty {
            $($variant,)+
        }

        impl $ty {
            pub const ALL: &'static [$ty] = &[$($ty::$variant,)+];

            pub fn key(&self) -> &'static str {
                match self {
                    $($ty::$variant => $key,)+
                }
            }

            /// The text-embedding model this provider key aliases.
            pub fn text_model(&self) -> TextEmbeddingModel {
                match self {
                    $($ty::$variant => TextEmbeddingModel::$text,)+
                }
            }

            pub fn model_name(&self) -> &'static str {
                self.text_model().model_name()
            }

            pub fn dimensions(&self) -> u32 {
                self.text_model().dimensions()
            }
        }

        impl FromStr for $ty {
            type Err = LanternError;

            /// Accepts the provider key (`ADA_002`) or the text key it
            /// aliases (`OPENAI_ADA_002`).
            fn from_str(key: &str) -> Result<Self, Self::Err> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|m| m.key() == key || m.text_model().key() == key)
                    .ok_or_else(|| LanternError::UnknownModel {
                        namespace: $namespace,
                        key: key.to_string(),
                    })
            }
        }

        impl From<$ty> for TextEmbeddingModel {
            fn from(model: $ty) -> Self {
                model.text_model()
            }
        }

        key_serde!($ty);
    };
}

model_enum! {
    /// Text-embedding models served by `text_embedding(...)`.
    TextEmbeddingModel, ModelNamespace::Text, {
        MicrosoftMinilmL12V2 => ("MICROSOFT_MINILM_L12_V2", "microsoft/all-MiniLM-L12-v2", 384),
        ClipVitB32Textual => ("CLIP_VIT_B_32_TEXTUAL", "clip/ViT-B-32-textual", 512),
        BaaiBgeSmallEn => ("BAAI_BGE_SMALL_EN", "BAAI/bge-small-en", 384),
        ThenlperGteBase => ("THENLPER_GTE_BASE", "thenlper/gte-base", 768),
        IntfloatE5BaseV2 => ("INTFLOAT_E5_BASE_V2", "intfloat/e5-base-v2", 768),
        MicrosoftMpnetBaseV2 => ("MICROSOFT_MPNET_BASE_V2", "microsoft/all-mpnet-base-v2", 768),
        MultiQaMpnetBaseDotV1 => ("MULTI_QA_MPNET_BASE_DOT_V1", "transformers/multi-qa-mpnet-base-dot-v1", 768),
        BaaiBgeBaseEn => ("BAAI_BGE_BASE_EN", "BAAI/bge-base-en", 768),
        ThenlperGteLarge => ("THENLPER_GTE_LARGE", "thenlper/gte-large", 1024),
        LlmrailsEmberV1 => ("LLMRAILS_EMBER_V1", "llmrails/ember-v1", 1024),
        IntfloatE5LargeV2 => ("INTFLOAT_E5_LARGE_V2", "intfloat/e5-large-v2", 1024),
        BaaiBgeLargeEn => ("BAAI_BGE_LARGE_EN", "BAAI/bge-large-en", 1024),
        JinaaiEmbeddingsV2SmallEn => ("JINAAI_EMBEDDINGS_V2_SMALL_EN", "jinaai/jina-embeddings-v2-small-en", 512),
        JinaaiEmbeddingsV2BaseEn => ("JINAAI_EMBEDDINGS_V2_BASE_EN", "jinaai/jina-embeddings-v2-base-en", 768),
        OpenAiAda002 => ("OPENAI_ADA_002", "openai/text-embedding-ada-002", 1536),
        OpenAiSmall3 => ("OPENAI_SMALL_3", "openai/text-embedding-3-small", 1536),
        OpenAiLarge3 => ("OPENAI_LARGE_3", "openai/text-embedding-3-large", 3072),
        CohereEnglishV3_0 => ("COHERE_ENGLISH_V3_0", "cohere/embed-english-v3.0", 1024),
        CohereMultilingualV3_0 => ("COHERE_MULTILINGUAL_V3_0", "cohere/embed-multilingual-v3.0", 1024),
        CohereEnglishV2_0 => ("COHERE_ENGLISH_V2_0", "cohere/embed-english-v2.0", 4096),
        CohereEnglishLightV2_0 => ("COHERE_ENGLISH_LIGHT_V2_0", "cohere/embed-english-light-v2.0", 1024),
        CohereMultilingualV2_0 => ("COHERE_MULTILINGUAL_V2_0", "cohere/embed-multilingual-v2.0", 768),
        CohereEnglishLightV3_0 => ("COHERE_ENGLISH_LIGHT_V3_0", "cohere/embed-english-light-v3.0", 384),
        CohereMultilingualLightV3_0 => ("COHERE_MULTILINGUAL_LIGHT_V3_0", "cohere/embed-multilingual-light-v3.0", 384),
    }
}

model_enum! {
    /// Image-embedding models served by `image_embedding(...)`.
    ImageEmbeddingModel, ModelNamespace::Image, {
        ClipVitB32Visual => ("CLIP_VIT_B_32_VISUAL", "clip/ViT-B-32-visual", 512),
    }
}

provider_enum! {
    /// Text models accepted by `openai_embedding(...)`, which also takes an
    /// optional output dimensionality.
    OpenAiTextEmbeddingModel, ModelNamespace::OpenAi, {
        Ada002 => ("ADA_002", OpenAiAda002),
        Small3 => ("SMALL_3", OpenAiSmall3),
        Large3 => ("LARGE_3", OpenAiLarge3),
    }
}

provider_enum! {
    /// Text models accepted by `cohere_embedding(...)`.
    CohereTextEmbeddingModel, ModelNamespace::Cohere, {
        EnglishV3_0 => ("ENGLISH_V3_0", CohereEnglishV3_0),
        MultilingualV3_0 => ("MULTILINGUAL_V3_0", CohereMultilingualV3_0),
        EnglishV2_0 => ("ENGLISH_V2_0", CohereEnglishV2_0),
        EnglishLightV2_0 => ("ENGLISH_LIGHT_V2_0", CohereEnglishLightV2_0),
        MultilingualV2_0 => ("MULTILINGUAL_V2_0", CohereMultilingualV2_0),
        EnglishLightV3_0 => ("ENGLISH_LIGHT_V3_0", CohereEnglishLightV3_0),
        MultilingualLightV3_0 => ("MULTILINGUAL_LIGHT_V3_0", CohereMultilingualLightV3_0),
    }
}

/// A model tagged with the namespace it was resolved in.
///
/// The namespace decides which SQL function computes the embedding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmbeddingModel {
    Text(TextEmbeddingModel),
    Image(ImageEmbeddingModel),
    OpenAi(OpenAiTextEmbeddingModel),
    Cohere(CohereTextEmbeddingModel),
}

impl EmbeddingModel {
    /// Look up `key` in `namespace`.
    pub fn parse(namespace: ModelNamespace, key: &str) -> Result<Self, LanternError> {
        Ok(match namespace {
            ModelNamespace::Text => EmbeddingModel::Text(key.parse()?),
            ModelNamespace::Image => EmbeddingModel::Image(key.parse()?),
            ModelNamespace::OpenAi => EmbeddingModel::OpenAi(key.parse()?),
            ModelNamespace::Cohere => EmbeddingModel::Cohere(key.parse()?),
        })
    }

    pub fn namespace(&self) -> ModelNamespace {
        match self {
            EmbeddingModel::Text(_) => ModelNamespace::Text,
            EmbeddingModel::Image(_) => ModelNamespace::Image,
            EmbeddingModel::OpenAi(_) => ModelNamespace::OpenAi,
            EmbeddingModel::Cohere(_) => ModelNamespace::Cohere,
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            EmbeddingModel::Text(m) => m.key(),
            EmbeddingModel::Image(m) => m.key(),
            EmbeddingModel::OpenAi(m) => m.key(),
            EmbeddingModel::Cohere(m) => m.key(),
        }
    }

    pub fn model_name(&self) -> &'static str {
        match self {
            EmbeddingModel::Text(m) => m.model_name(),
            EmbeddingModel::Image(m) => m.model_name(),
            EmbeddingModel::OpenAi(m) => m.model_name(),
            EmbeddingModel::Cohere(m) => m.model_name(),
        }
    }

    pub fn dimensions(&self) -> u32 {
        match self {
            EmbeddingModel::Text(m) => m.dimensions(),
            EmbeddingModel::Image(m) => m.dimensions(),
            EmbeddingModel::OpenAi(m) => m.dimensions(),
            EmbeddingModel::Cohere(m) => m.dimensions(),
        }
    }

    /// Unqualified name of the SQL function that computes this embedding.
    pub fn function_name(&self) -> &'static str {
        match self {
            EmbeddingModel::Text(_) => "text_embedding",
            EmbeddingModel::Image(_) => "image_embedding",
            EmbeddingModel::OpenAi(_) => "openai_embedding",
            EmbeddingModel::Cohere(_) => "cohere_embedding",
        }
    }

    /// Whether the function accepts a trailing output-dimension argument.
    pub fn accepts_dimension(&self) -> bool {
        matches!(self, EmbeddingModel::OpenAi(_))
    }
}

impl From<TextEmbeddingModel> for EmbeddingModel {
    fn from(model: TextEmbeddingModel) -> Self {
        EmbeddingModel::Text(model)
    }
}

impl From<ImageEmbeddingModel> for EmbeddingModel {
    fn from(model: ImageEmbeddingModel) -> Self {
        EmbeddingModel::Image(model)
    }
}

impl From<OpenAiTextEmbeddingModel> for EmbeddingModel {
    fn from(model: OpenAiTextEmbeddingModel) -> Self {
        EmbeddingModel::OpenAi(model)
    }
}

impl From<CohereTextEmbeddingModel> for EmbeddingModel {
    fn from(model: CohereTextEmbeddingModel) -> Self {
        EmbeddingModel::Cohere(model)
    }
}

/// Resolve `key` in `namespace` to the identifier the extension expects.
pub fn resolve(namespace: ModelNamespace, key: &str) -> Result<&'static str, LanternError> {
    EmbeddingModel::parse(namespace, key).map(|m| m.model_name())
}
