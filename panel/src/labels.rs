//! Fixed display strings of the search screen.

pub const TITLE: &str = "Агрегатор запчастей";
pub const SEARCH_INPUT: &str = "Поиск запчастей";
pub const MODEL_INPUT: &str = "Модель";
pub const SEARCH_BUTTON: &str = "Найти";
pub const BRAND: &str = "Бренд";
pub const PRICE: &str = "Цена";
pub const LOCATION: &str = "Местоположение";
pub const DATE: &str = "Дата";
pub const IMAGE: &str = "Фото";
pub const LINK: &str = "Перейти";
pub const LOADING: &str = "Загрузка...";
pub const NO_DATA: &str = "Нет данных для отображения";
pub const HELP: &str = "Tab: фокус · Enter: найти / открыть ссылку · ←↑↓→: выбор · Esc: выход";
