use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Number of numbered ingredient/measure pairs TheCocktailDB exposes per drink
pub const INGREDIENT_SLOTS: usize = 15;

/// One drink entry as it comes back from TheCocktailDB, before normalization.
///
/// The upstream object is loosely typed: every key may be missing or `null`,
/// and ingredients arrive as `strIngredient1..15` / `strMeasure1..15`. Those
/// numbered keys are folded into two fixed arrays so a slot is either
/// `Some(text)` or `None`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct RawDrinkRecord {
    pub id_drink: Option<String>,
    pub str_drink: Option<String>,
    pub str_drink_thumb: Option<String>,
    pub str_category: Option<String>,
    pub str_glass: Option<String>,
    pub str_instructions: Option<String>,
    pub str_tags: Option<String>,
    ingredients: [Option<String>; INGREDIENT_SLOTS],
    measures: [Option<String>; INGREDIENT_SLOTS],
}

impl RawDrinkRecord {
    /// Ingredient in slot `index` (1-based, as upstream numbers them).
    pub fn ingredient(&self, index: usize) -> Option<&str> {
        slot(&self.ingredients, index)
    }

    /// Measure in slot `index` (1-based).
    pub fn measure(&self, index: usize) -> Option<&str> {
        slot(&self.measures, index)
    }

    /// Fill ingredient slot `index` (1-based). Out-of-range indices are ignored.
    fn set_ingredient(&mut self, index: usize, value: Option<String>) {
        if let Some(cell) = slot_mut(&mut self.ingredients, index) {
            *cell = value;
        }
    }

    /// Fill measure slot `index` (1-based). Out-of-range indices are ignored.
    fn set_measure(&mut self, index: usize, value: Option<String>) {
        if let Some(cell) = slot_mut(&mut self.measures, index) {
            *cell = value;
        }
    }
}

fn slot(slots: &[Option<String>; INGREDIENT_SLOTS], index: usize) -> Option<&str> {
    index
        .checked_sub(1)
        .and_then(|i| slots.get(i))
        .and_then(|v| v.as_deref())
}

fn slot_mut(
    slots: &mut [Option<String>; INGREDIENT_SLOTS],
    index: usize,
) -> Option<&mut Option<String>> {
    index.checked_sub(1).and_then(|i| slots.get_mut(i))
}

/// Scalars are kept as text; `null`, objects and arrays count as absent.
fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Parses the number out of `strIngredient7` / `strMeasure12` style keys.
fn numbered_slot(key: &str, prefix: &str) -> Option<usize> {
    key.strip_prefix(prefix)?
        .parse::<usize>()
        .ok()
        .filter(|i| (1..=INGREDIENT_SLOTS).contains(i))
}

impl From<Map<String, Value>> for RawDrinkRecord {
    fn from(map: Map<String, Value>) -> Self {
        let mut record = RawDrinkRecord::default();

        for (key, value) in map {
            let text = scalar_text(value);
            match key.as_str() {
                "idDrink" => record.id_drink = text,
                "strDrink" => record.str_drink = text,
                "strDrinkThumb" => record.str_drink_thumb = text,
                "strCategory" => record.str_category = text,
                "strGlass" => record.str_glass = text,
                "strInstructions" => record.str_instructions = text,
                "strTags" => record.str_tags = text,
                other => {
                    if let Some(i) = numbered_slot(other, "strIngredient") {
                        record.set_ingredient(i, text);
                    } else if let Some(i) = numbered_slot(other, "strMeasure") {
                        record.set_measure(i, text);
                    }
                    // Everything else (strAlcoholic, strIBA, translations...) is ignored
                }
            }
        }

        record
    }
}

/// A single ingredient line of a cocktail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub measure: String,
}

/// Fully normalized cocktail, as served by the detail and random endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cocktail {
    pub id: String,
    pub name: String,
    pub image: String,
    pub category: String,
    pub glass: String,
    pub instructions: String,
    pub ingredients: Vec<Ingredient>,
    pub tags: Vec<String>,
}

/// Light projection used by list views
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CocktailListItem {
    pub id: String,
    pub name: String,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResults {
    pub cocktails: Vec<CocktailListItem>,
    pub total: usize,
}

impl From<Vec<CocktailListItem>> for SearchResults {
    fn from(cocktails: Vec<CocktailListItem>) -> Self {
        let total = cocktails.len();
        Self { cocktails, total }
    }
}

/// The upstream envelope. `drinks` is `null` when nothing matched.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub drinks: Option<Vec<T>>,
}

impl<T> ApiResponse<T> {
    pub fn empty() -> Self {
        Self { drinks: None }
    }
}

impl<T> Default for ApiResponse<T> {
    fn default() -> Self {
        Self::empty()
    }
}

/// JSON error envelope returned by our own endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}
