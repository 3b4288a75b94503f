//! Built-in recipes: the document a session starts with and the one the
//! simulated extractor hands back.

use crate::model::{ImageSource, Instruction, RecipeDocument};

fn steps(items: &[(&str, &str)]) -> Vec<Instruction> {
    items
        .iter()
        .enumerate()
        .map(|(i, (title, text))| Instruction {
            step: i + 1,
            title: title.to_string(),
            text: text.to_string(),
        })
        .collect()
}

fn lines(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// The recipe every session opens with.
pub fn initial_recipe() -> RecipeDocument {
    RecipeDocument {
        title: "Zesty Lemon Garlic Shrimp Pasta".to_string(),
        servings: "4".to_string(),
        prep_time: "15 Min".to_string(),
        cook_time: "20 Min".to_string(),
        ingredients: lines(&[
            "8 oz linguine pasta",
            "2 tbsp olive oil",
            "1 lb large shrimp, peeled and deveined",
            "Salt to taste",
            "Black pepper to taste",
            "1 tbsp minced garlic",
            "1 tsp red pepper flakes",
            "1/2 cup chicken broth",
            "1 cup fresh lemon juice",
            "Zest of 1 lemon",
            "1/2 cup finely chopped fresh parsley",
            "Grated Parmesan cheese for serving",
        ]),
        instructions: steps(&[
            (
                "Cook the pasta:",
                "Bring a large pot of salted water to a boil. Add the linguine and cook until al dente, according to the package instructions. Drain and set aside.",
            ),
            (
                "Prepare the shrimp:",
                "Meanwhile, heat the olive oil in a large skillet over medium-high heat. Add the shrimp, season with salt and pepper, and sauté until they turn pink, about 2-3 minutes per side. Remove the shrimp from the skillet and set aside.",
            ),
            (
                "Make the sauce:",
                "In the same skillet, add the minced garlic and red pepper flakes. Cook until the garlic is fragrant, about 1 minute. Stir in the chicken broth, lemon juice, and lemon zest. Bring the mixture to a simmer and cook for about 5 minutes, or until the sauce has reduced by half.",
            ),
            (
                "Combine the pasta and shrimp with the sauce:",
                "Return the shrimp to the skillet. Add the cooked pasta and toss to combine, making sure the pasta is well-coated with the sauce.",
            ),
            (
                "Serve:",
                "Remove the skillet from the heat. Sprinkle with the chopped fresh parsley and grated Parmesan cheese. Serve immediately.",
            ),
        ]),
        tips: "For an extra punch of flavor, add a splash of white wine to the sauce. Feel free to add more vegetables like cherry tomatoes or spinach for added nutrition. Use whole grain pasta for a healthier twist.".to_string(),
        image_url: ImageSource::Remote(
            "https://images.unsplash.com/photo-1563379926898-05f4575a45d8?ixlib=rb-4.0.3&auto=format&fit=crop&w=1600&q=80".to_string(),
        ),
    }
}

/// The recipe the simulated extractor always drafts.
pub fn carbonara_recipe() -> RecipeDocument {
    RecipeDocument {
        title: "Classic Spaghetti Carbonara".to_string(),
        servings: "4".to_string(),
        prep_time: "10 Min".to_string(),
        cook_time: "15 Min".to_string(),
        ingredients: lines(&[
            "12 oz spaghetti",
            "4 large eggs",
            "1 cup grated Pecorino Romano cheese",
            "1/2 lb guanciale or pancetta, diced",
            "Freshly cracked black pepper",
            "Salt (for pasta water)",
        ]),
        instructions: steps(&[
            ("Boil the water:", "Bring a large pot of salted water to a boil."),
            (
                "Cook the meat:",
                "While the water heats, sauté the guanciale (or pancetta) in a large skillet over medium heat until crispy and the fat has rendered. Remove from heat and set aside.",
            ),
            (
                "Prepare the sauce:",
                "In a medium bowl, whisk together the eggs and grated Pecorino Romano cheese until well combined. Season generously with black pepper.",
            ),
            (
                "Cook the pasta:",
                "Add the spaghetti to the boiling water and cook until al dente. Reserve 1 cup of the starchy pasta water, then drain the pasta.",
            ),
            (
                "Combine:",
                "Add the hot pasta directly to the skillet with the guanciale. Toss to coat in the fat. Remove the skillet from the heat completely (crucial step to avoid scrambling the eggs).",
            ),
            (
                "Creamify:",
                "Pour the egg and cheese mixture over the pasta, tossing quickly and continuously. Add small splashes of the reserved pasta water as needed to create a creamy, glossy emulsion.",
            ),
            (
                "Serve:",
                "Serve immediately, topped with extra cheese and more freshly cracked black pepper.",
            ),
        ]),
        tips: "Use room temperature eggs to help the emulsion form more easily. Never add the egg mixture while the pan is on the heat, or you'll end up with scrambled eggs instead of a sauce.".to_string(),
        image_url: ImageSource::Remote(
            "https://images.unsplash.com/photo-1612874742237-6526221588e3?ixlib=rb-4.0.3&auto=format&fit=crop&w=1600&q=80".to_string(),
        ),
    }
}
