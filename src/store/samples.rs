// file: src/store/samples.rs
// description: demonstration knowledge base used when no library exists yet
// reference: internal sample data

use crate::models::Document;

const SAMPLES: [(&str, &str); 5] = [
    (
        "What is RAG?",
        "Retrieval-Augmented Generation (RAG) is a technique that enhances large language models \
by retrieving relevant information from external sources before generating a response.\n\n\
RAG combines the strengths of retrieval-based and generation-based approaches to AI. It first \
retrieves relevant documents or information from a knowledge base, then uses this information \
to augment the context provided to the language model.\n\n\
This approach helps to ground the model's responses in factual information, reducing \
hallucinations and improving accuracy, especially for domain-specific or factual questions.",
    ),
    (
        "Supabase Features",
        "Supabase is an open-source Firebase alternative that provides a suite of tools for \
building applications:\n\n\
1. PostgreSQL Database: A powerful, open-source relational database with real-time capabilities.\n\
2. Authentication: Built-in auth with support for email/password, magic links, OAuth providers, and more.\n\
3. Storage: Store and serve large files with security rules.\n\
4. Edge Functions: Run serverless functions globally.\n\
5. Realtime: Subscribe to database changes via websockets.\n\
6. Vector Embeddings: Store and query vector embeddings for AI applications.\n\n\
Supabase is designed to be developer-friendly with comprehensive documentation and client \
libraries for various platforms.",
    ),
    (
        "React Best Practices",
        "Here are some React best practices for 2025:\n\n\
1. Use functional components with hooks instead of class components.\n\
2. Implement proper state management - use Context API for simple state or libraries like Redux for complex state.\n\
3. Memoize expensive calculations with useMemo and useCallback.\n\
4. Split your application into small, reusable components.\n\
5. Use React.lazy and Suspense for code-splitting.\n\
6. Implement proper error boundaries to catch and handle errors gracefully.\n\
7. Use TypeScript for type safety.\n\
8. Follow the principle of lifting state up when needed.\n\
9. Use proper key props when rendering lists.\n\
10. Optimize rendering with React.memo for pure components.",
    ),
    (
        "JavaScript Array Methods",
        "JavaScript provides many useful array methods:\n\n\
1. map() - Creates a new array by applying a function to each element\n\
2. filter() - Creates a new array with elements that pass a test\n\
3. reduce() - Reduces an array to a single value by applying a function\n\
4. forEach() - Executes a function for each element (no return value)\n\
5. find() - Returns the first element that passes a test\n\
6. some() - Tests if at least one element passes a test\n\
7. every() - Tests if all elements pass a test\n\
8. sort() - Sorts the elements of an array\n\
9. includes() - Tests if an array includes a specific element\n\
10. flat() - Creates a new array with sub-array elements concatenated\n\n\
These methods are powerful tools for functional programming in JavaScript.",
    ),
    (
        "Tailwind CSS Tips",
        "Tailwind CSS tips for efficient development:\n\n\
1. Use the @apply directive in CSS files to extract repeated utility patterns.\n\
2. Create component classes for consistent styling across your application.\n\
3. Use the config file to customize colors, spacing, and breakpoints.\n\
4. Leverage JIT (Just-In-Time) mode for faster development and smaller file sizes.\n\
5. Use arbitrary values when you need specific values not in your theme.\n\
6. Group hover states with group-hover classes for complex interactions.\n\
7. Use variants like dark: for dark mode support.\n\
8. Organize complex components with plugins.\n\
9. Use the official Tailwind CSS plugins for forms, typography, and more.\n\
10. Purge unused CSS in production for optimal performance.",
    ),
];

pub fn sample_documents() -> Vec<Document> {
    SAMPLES
        .iter()
        .map(|(title, content)| Document::new(*title, *content))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_samples_are_distinct() {
        let docs = sample_documents();
        assert_eq!(docs.len(), 5);
        assert_eq!(docs[0].title, "What is RAG?");

        let mut hashes: Vec<&str> = docs.iter().map(|d| d.content_hash.as_str()).collect();
        hashes.sort();
        hashes.dedup();
        assert_eq!(hashes.len(), 5);
    }
}
