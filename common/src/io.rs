pub mod drom {
    use serde::Deserialize;

    /// Pair of user-entered strings the parts request path is built from.
    /// Neither side is validated, both may be empty.
    #[derive(Debug, Clone, Default, PartialEq, Eq)]
    pub struct SearchQuery {
        pub search_string: String,
        pub model: String,
    }

    impl SearchQuery {
        pub fn new(search_string: impl Into<String>, model: impl Into<String>) -> Self {
            Self {
                search_string: search_string.into(),
                model: model.into(),
            }
        }
    }

    /// Single listing returned by `GET /drom/{search_string}/{model}`.
    ///
    /// Every field is required, a payload missing one of them fails to decode
    /// instead of rendering a blank card.
    #[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
    pub struct Part {
        pub title: String,
        pub brand: String,
        pub price: String,
        pub location: String,
        pub date: String,
        pub image_url: String,
        pub link: String,
    }

}
