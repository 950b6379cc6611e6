//! Constants module for the Filmow scraper
//!
//! Contains endpoint URL builders, the CSS selectors used on listing pages
//! and the localized labels shown to the user.

/// URL builder functions for all endpoints
pub mod endpoints {
    use crate::models::{MediaCategory, MediaType};

    /// Public profile URL of a user
    pub fn profile(base_url: &str, user: &str) -> String {
        format!(
            "{}/usuario/{}",
            base_url.trim_end_matches('/'),
            urlencoding::encode(user)
        )
    }

    /// One page of a listing, pages start at 1
    pub fn listing(
        base_url: &str,
        user: &str,
        media_type: MediaType,
        category: MediaCategory,
        page: u32,
    ) -> String {
        format!(
            "{}/{}/{}/?pagina={}",
            profile(base_url, user),
            media_type.slug(),
            category.slug(),
            page
        )
    }
}

/// CSS selectors for listing pages
pub mod selectors {
    /// One media item in a listing
    pub const ITEM: &str = ".movie_list_item";
    /// Poster wrapper holding the titled image
    pub const WRAPPER: &str = "span.wrapper";
    pub const IMAGE: &str = "img";
    /// Star rating of the user, its title reads like "Nota: 4,5 estrelas"
    pub const RATING: &str = "span.star-rating";
    /// Pagination control
    pub const PAGINATION: &str = ".pagination";
    pub const LAST_PAGE: &str = "a[title=\"última página\"]";
    pub const PAGE_LINK: &str = "a[href]";
    pub const LINK: &str = "a";
}

/// Query parameter carrying the page number
pub const PAGE_PARAM: &str = "pagina";

/// Token marking a season entry in TV show titles
pub const SEASON_MARKER: &str = "Temporada)";

/// Localized labels
pub mod labels {
    use crate::models::{Language, MediaCategory, MediaType};

    /// Sheet label for one listing, used as JSON key and CSV file name
    pub fn sheet(language: Language, media_type: MediaType, category: MediaCategory) -> &'static str {
        use MediaCategory::*;
        use MediaType::*;

        match (language, media_type, category) {
            (Language::Pt, Movie, Watched) => "Filmes - Já vi",
            (Language::Pt, Movie, Favorites) => "Filmes - Favoritos",
            (Language::Pt, Movie, ToWatch) => "Filmes - Quero ver",
            (Language::Pt, TvShow, Watched) => "Séries - Já vi",
            (Language::Pt, TvShow, Favorites) => "Séries - Favoritos",
            (Language::Pt, TvShow, ToWatch) => "Séries - Quero ver",
            (Language::En, Movie, Watched) => "Movies - Watched",
            (Language::En, Movie, Favorites) => "Movies - Favorites",
            (Language::En, Movie, ToWatch) => "Movies - To Watch",
            (Language::En, TvShow, Watched) => "TV Shows - Watched",
            (Language::En, TvShow, Favorites) => "TV Shows - Favorites",
            (Language::En, TvShow, ToWatch) => "TV Shows - To Watch",
        }
    }
}

/// Console messages shown by the command line tool
pub mod messages {
    use crate::models::{Language, MediaType};

    pub fn welcome(language: Language, user: &str) -> String {
        match language {
            Language::Pt => format!("Bem-vindo, {}. Vamos extrair os seus dados do Filmow.", user),
            Language::En => format!("Welcome, {}. Let's extract your data from Filmow.", user),
        }
    }

    pub fn wait(language: Language) -> &'static str {
        match language {
            Language::Pt => "Aguarde até a mensagem de conclusão do procedimento.",
            Language::En => "Please wait until the completion message.",
        }
    }

    pub fn username_prompt(language: Language) -> &'static str {
        match language {
            Language::Pt => "Por favor, informe seu nome de usuário do Filmow: ",
            Language::En => "Please enter your Filmow username: ",
        }
    }

    pub fn extracting(language: Language, media_type: MediaType) -> &'static str {
        match (language, media_type) {
            (Language::Pt, MediaType::Movie) => "Extraindo filmes...",
            (Language::Pt, MediaType::TvShow) => "Extraindo séries...",
            (Language::En, MediaType::Movie) => "Extracting movies...",
            (Language::En, MediaType::TvShow) => "Extracting TV shows...",
        }
    }

    pub fn found(
        language: Language,
        media_type: MediaType,
        watched: usize,
        favorites: usize,
        to_watch: usize,
    ) -> String {
        match (language, media_type) {
            (Language::Pt, MediaType::Movie) => format!(
                "Encontrados {} filmes assistidos, {} filmes favoritos e {} filmes para assistir.",
                watched, favorites, to_watch
            ),
            (Language::Pt, MediaType::TvShow) => format!(
                "Encontradas {} séries assistidas, {} séries favoritas e {} séries para assistir.",
                watched, favorites, to_watch
            ),
            (Language::En, MediaType::Movie) => format!(
                "Found {} watched movies, {} favorite movies, and {} movies to watch.",
                watched, favorites, to_watch
            ),
            (Language::En, MediaType::TvShow) => format!(
                "Found {} watched TV shows, {} favorite TV shows, and {} TV shows to watch.",
                watched, favorites, to_watch
            ),
        }
    }

    pub fn sorting(language: Language) -> &'static str {
        match language {
            Language::Pt => "Ordenando dados...",
            Language::En => "Sorting data...",
        }
    }

    pub fn exporting(language: Language) -> &'static str {
        match language {
            Language::Pt => "Exportando dados...",
            Language::En => "Exporting data...",
        }
    }

    pub fn json_success(language: Language, path: &str) -> String {
        match language {
            Language::Pt => format!("Arquivo JSON \"{}\" criado com sucesso!", path),
            Language::En => format!("JSON file \"{}\" created successfully!", path),
        }
    }

    pub fn xlsx_success(language: Language, path: &str) -> String {
        match language {
            Language::Pt => format!("Arquivo Excel \"{}\" criado com sucesso!", path),
            Language::En => format!("Excel file \"{}\" created successfully!", path),
        }
    }

    pub fn csv_success(language: Language, path: &str) -> String {
        match language {
            Language::Pt => format!("Arquivos CSV criados com sucesso no diretório \"{}\"!", path),
            Language::En => format!("CSV files created successfully in directory \"{}\"!", path),
        }
    }

    pub fn completion(language: Language) -> &'static str {
        match language {
            Language::Pt => "Procedimento concluído com sucesso!",
            Language::En => "Process completed successfully!",
        }
    }
}
