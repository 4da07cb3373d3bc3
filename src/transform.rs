use std::cmp::Ordering;

use log::warn;

use crate::model::{
    ApiResponse, Cocktail, CocktailListItem, Ingredient, RawDrinkRecord, INGREDIENT_SLOTS,
};

/// Collects the non-blank ingredient slots of a drink, in slot order.
///
/// Every slot is looked at independently, so a gap (slot 3 empty, slot 5 set)
/// does not end the scan.
pub fn extract_ingredients(drink: &RawDrinkRecord) -> Vec<Ingredient> {
    (1..=INGREDIENT_SLOTS)
        .filter_map(|i| {
            let name = drink.ingredient(i)?.trim();
            if name.is_empty() {
                return None;
            }
            Some(Ingredient {
                name: name.to_string(),
                measure: drink.measure(i).map(str::trim).unwrap_or_default().to_string(),
            })
        })
        .collect()
}

/// Splits `strTags` ("IBA,Classic") into trimmed tags.
fn split_tags(tags: Option<&str>) -> Vec<String> {
    match tags {
        Some(raw) if !raw.is_empty() => raw.split(',').map(|t| t.trim().to_string()).collect(),
        _ => Vec::new(),
    }
}

/// `idDrink` and `strDrink` should always be present; a record without them
/// gets an empty placeholder so one bad entry cannot sink a whole listing.
fn required(value: &Option<String>, key: &str, drink: &RawDrinkRecord) -> String {
    match value {
        Some(v) => v.clone(),
        None => {
            warn!(
                "Upstream drink is missing {} (idDrink={:?}), using empty placeholder",
                key, drink.id_drink
            );
            String::new()
        }
    }
}

/// Maps one raw drink to our `Cocktail` model
pub fn transform_cocktail(drink: &RawDrinkRecord) -> Cocktail {
    Cocktail {
        id: required(&drink.id_drink, "idDrink", drink),
        name: required(&drink.str_drink, "strDrink", drink),
        image: drink.str_drink_thumb.clone().unwrap_or_default(),
        category: drink.str_category.clone().unwrap_or_default(),
        glass: drink.str_glass.clone().unwrap_or_default(),
        instructions: drink.str_instructions.clone().unwrap_or_default(),
        ingredients: extract_ingredients(drink),
        tags: split_tags(drink.str_tags.as_deref()),
    }
}

/// Maps one raw drink to the light list projection
pub fn transform_list_item(drink: &RawDrinkRecord) -> CocktailListItem {
    CocktailListItem {
        id: required(&drink.id_drink, "idDrink", drink),
        name: required(&drink.str_drink, "strDrink", drink),
        category: drink.str_category.clone().unwrap_or_default(),
    }
}

/// Applies `transformer` to every drink of an upstream response.
///
/// A `null` `drinks` field is the API's way of saying "no matches" and maps
/// to an empty vector.
pub fn transform_api_response<R, T, F>(response: ApiResponse<R>, transformer: F) -> Vec<T>
where
    F: FnMut(R) -> T,
{
    match response.drinks {
        Some(drinks) => drinks.into_iter().map(transformer).collect(),
        None => Vec::new(),
    }
}

/// Primary collation key: lowercase with common Latin accents folded, so
/// "Árbol" sorts next to "arbol" rather than after "Zombie".
fn collation_key(s: &str) -> String {
    s.chars()
        .flat_map(char::to_lowercase)
        .map(fold_accent)
        .collect()
}

fn fold_accent(c: char) -> char {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' => 'a',
        'ç' | 'ć' | 'č' => 'c',
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ę' => 'e',
        'ì' | 'í' | 'î' | 'ï' | 'ī' => 'i',
        'ñ' | 'ń' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' => 'o',
        'ù' | 'ú' | 'û' | 'ü' | 'ū' => 'u',
        'ý' | 'ÿ' => 'y',
        'š' | 'ś' => 's',
        'ž' | 'ź' | 'ż' => 'z',
        'ł' => 'l',
        other => other,
    }
}

/// Tertiary key: inverted case, so lowercase sorts before uppercase.
fn case_key(s: &str) -> String {
    s.chars()
        .flat_map(|c| {
            if c.is_uppercase() {
                c.to_lowercase().collect::<Vec<_>>()
            } else {
                c.to_uppercase().collect()
            }
        })
        .collect()
}

/// Locale-style name comparison: accents break ties first, then case.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| case_key(a).cmp(&case_key(b)))
        .then_with(|| a.cmp(b))
}

/// Sorts list items by name, ascending
pub fn sort_by_name(items: &mut [CocktailListItem]) {
    items.sort_by(|a, b| compare_names(&a.name, &b.name));
}
