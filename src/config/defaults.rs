// src/config/defaults.rs

/// Configuration used when no config file is present: the stock device
/// settings plus the factory recipe book.
pub const BUILTIN_CONFIG: &str = r#"
[device]
tick_ms = 100
ambient_temperature = 20
initial_mode = "manual"

[[recipe]]
id = 1
name = "Tomato sauce"
description = "Quick sauce for pasta."
servings = 4
difficulty = "easy"
ingredients = [
    { name = "tomatoes", quantity = 6 },
    { name = "onion", quantity = 1 },
    { name = "olive oil", quantity = 30, unit = "ml" },
]
steps = [
    { operation = "chop", duration = 15, description = "Chop onion and tomatoes" },
    { operation = "saute", duration = 300, description = "Soften the onion" },
    { operation = "boil", duration = 900, description = "Simmer until thick" },
]

[[recipe]]
id = 2
name = "Bread dough"
description = "Basic white bread dough."
servings = 6
difficulty = "medium"
ingredients = [
    { name = "flour", quantity = 500, unit = "g" },
    { name = "water", quantity = 300, unit = "ml" },
    { name = "yeast", quantity = 7, unit = "g" },
    { name = "salt", quantity = 10, unit = "g" },
]
steps = [
    { operation = "knead", duration = 30, description = "Mix the ingredients" },
    { operation = "knead", duration = 240, description = "Knead until smooth" },
]

[[recipe]]
id = 3
name = "Steamed vegetables"
servings = 2
difficulty = "easy"
ingredients = [
    { name = "carrots", quantity = 2 },
    { name = "broccoli", quantity = 300, unit = "g" },
]
steps = [
    { operation = "dice", duration = 10, description = "Dice the carrots" },
    { operation = "steam", duration = 720 },
]

[[recipe]]
id = 4
name = "Vegetable soup"
servings = 4
difficulty = "medium"
ingredients = [
    { name = "potatoes", quantity = 3 },
    { name = "leek", quantity = 1 },
    { name = "vegetable stock", quantity = 1, unit = "l" },
]
steps = [
    { operation = "dice", duration = 12 },
    { operation = "saute", duration = 180 },
    { operation = "boil", duration = 1200 },
    { operation = "chop", duration = 30, description = "Blend" },
]
"#;
