//! Prompt templates for the German exercise generator.
//!
//! Same contract as the enrichment prompts: the instruction text is the
//! specification of the expected output format, and the model is told
//! exactly what *not* to include (answers, translations, explanations).

use crate::exercises::history::PromptHistory;
use crate::store::DictionaryWord;

pub const GENERATION_SYSTEM: &str = "You are a German language exercise creator. Generate \
    exercises EXACTLY as specified in the format provided. Do not add extra explanations, \
    answers, or formatting beyond what is requested. Be creative with content but strict \
    with format.";

pub const GRADING_SYSTEM: &str = "You are a German language teacher providing structured, \
    helpful feedback. Follow the format exactly. Be supportive but accurate - don't say \
    something is correct if it isn't. Provide clear explanations that help students \
    understand and improve.";

pub const ANALYSIS_SYSTEM: &str =
    "You are a German language expert providing precise, well-formatted analysis.";

/// Exercise formats the generator knows how to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExerciseKind {
    Translation,
    Conversation,
    Grammar,
    Vocabulary,
    DictionaryPractice,
    ListeningPractice,
    CreativeWriting,
    ErrorCorrection,
}

impl ExerciseKind {
    /// Unknown type strings fall back to translation.
    pub fn parse(s: &str) -> Self {
        match s {
            "conversation" => Self::Conversation,
            "grammar" => Self::Grammar,
            "vocabulary" => Self::Vocabulary,
            "dictionary_practice" => Self::DictionaryPractice,
            "listening_practice" => Self::ListeningPractice,
            "creative_writing" => Self::CreativeWriting,
            "error_correction" => Self::ErrorCorrection,
            _ => Self::Translation,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Translation => "translation",
            Self::Conversation => "conversation",
            Self::Grammar => "grammar",
            Self::Vocabulary => "vocabulary",
            Self::DictionaryPractice => "dictionary_practice",
            Self::ListeningPractice => "listening_practice",
            Self::CreativeWriting => "creative_writing",
            Self::ErrorCorrection => "error_correction",
        }
    }
}

/// Topic code → human-readable description used in prompts. Codes not in
/// the table pass through verbatim.
pub fn topic_description(code: &str) -> &str {
    match code {
        "conv_greetings" => "basic greetings, introductions, and polite phrases",
        "conv_food" => "food items, dining, ordering at restaurants",
        "conv_travel" => "travel vocabulary, directions, transportation",
        "conv_shopping" => "shopping, prices, clothing, stores, money",
        "conv_work" => "work, business, professional communication",
        "conv_hobbies" => "hobbies, leisure activities, sports",
        "conv_family" => "family members, relationships, personal life",
        "conv_health" => "health, body parts, medical situations",
        "conv_weather" => "weather conditions, nature, seasons",
        "conv_education" => "education, learning, school, university",
        "conv_technology" => "technology, media, internet, computers",
        "conv_culture" => "culture, traditions, customs, celebrations",
        "conv_housing" => "housing, apartments, living situations",
        "conv_emergency" => "emergency situations, urgent communication",
        "conv_entertainment" => "entertainment, events, concerts, theater",
        "conv_opinions" => "expressing opinions, agreeing, disagreeing",
        "conv_smalltalk" => "small talk, chitchat, casual conversation",
        "conv_complaints" => "complaints, problems, dissatisfaction",
        "gram_cases" => "German cases (Nominativ, Akkusativ, Dativ, Genitiv)",
        "gram_articles" => "German articles (der, die, das)",
        "gram_verbs" => "verb conjugation in German",
        "gram_tenses" => "German tenses (present, past, future)",
        "gram_word_order" => "German word order and sentence structure",
        "gram_prepositions" => "German prepositions and their cases",
        "gram_adjectives" => "adjective endings in German",
        "gram_modal" => "German modal verbs (können, müssen, etc.)",
        "gram_pronouns" => "pronouns (personal, possessive, demonstrative)",
        "gram_reflexive" => "reflexive verbs in German",
        "gram_separable" => "separable and inseparable verbs",
        "gram_passive" => "passive voice construction",
        "gram_subjunctive" => "subjunctive mood (Konjunktiv I & II)",
        "gram_imperatives" => "imperatives and commands",
        "gram_comparatives" => "comparatives and superlatives",
        "gram_conjunctions" => "conjunctions and connectors",
        "gram_relative" => "relative clauses",
        "gram_infinitive" => "infinitive constructions (zu + infinitive)",
        "vocab_verbs" => "common German verbs",
        "vocab_nouns" => "common German nouns with articles",
        "vocab_adjectives" => "German adjectives and adverbs",
        "vocab_phrases" => "useful German phrases and idioms",
        "vocab_numbers" => "German numbers and time expressions",
        "vocab_colors" => "German colors and descriptions",
        "vocab_emotions" => "emotions and feelings vocabulary",
        "vocab_animals" => "animals and pets",
        "vocab_clothing" => "clothing and fashion vocabulary",
        "vocab_transport" => "transportation vocabulary",
        "vocab_professions" => "professions and jobs",
        "vocab_kitchen" => "kitchen and cooking vocabulary",
        "vocab_sports" => "sports and fitness vocabulary",
        "vocab_office" => "office and business vocabulary",
        other => other,
    }
}

/// Conversation scenarios, picked at random per exercise.
pub const CREATIVE_SCENARIOS: &[&str] = &[
    "You're at a German farmers market and discover an unusual vegetable",
    "You accidentally joined a German book club meeting",
    "You're teaching your German neighbor how to make your favorite dish",
    "You found a mysterious letter in German in an old book",
    "You're helping organize a surprise party for a German friend",
    "You're at a German flea market negotiating for a vintage item",
    "You met a German time traveler from 1920",
    "You're explaining your unusual hobby to curious Germans",
    "You're stuck in an elevator with Germans and making small talk",
    "You're collaborating with Germans on a quirky art project",
];

/// Creative-writing starters, picked at random per exercise.
pub const CREATIVE_WRITING_PROMPTS: &[&str] = &[
    "You discovered a magic portal in your local library",
    "You woke up speaking only German in a parallel universe",
    "You're writing a letter to your future self 10 years from now",
    "You found a mysterious package with your name on it",
    "You can communicate with animals for one day",
    "You're the last person on Earth who remembers yesterday",
    "You inherited a peculiar object from a distant relative",
    "You can see 5 minutes into the future",
];

/// One requested topic: either a known code or a free-text custom topic.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct TopicSelection {
    pub value: String,
    #[serde(default)]
    pub text: Option<String>,
}

/// Join the requested topics into the prompt's TOPIC line.
pub fn topic_context(topics: &[TopicSelection]) -> String {
    let custom = topics
        .iter()
        .find(|t| t.value == "custom_practice")
        .and_then(|t| t.text.as_deref())
        .filter(|t| !t.trim().is_empty());

    if let Some(text) = custom {
        return format!("Custom topic: {}", text);
    }

    let descriptions: Vec<&str> = topics
        .iter()
        .filter(|t| t.value != "custom_practice")
        .map(|t| topic_description(&t.value))
        .collect();

    if descriptions.is_empty() {
        "general German practice".to_string()
    } else {
        descriptions.join(", ")
    }
}

fn history_context(history: &PromptHistory) -> String {
    let recent = history.recent(5);
    if recent.is_empty() {
        return String::new();
    }
    let lines: Vec<String> = recent.iter().map(|ex| format!("- {}", ex)).collect();
    format!(
        "\n\nPrevious exercises to avoid repeating:\n{}",
        lines.join("\n")
    )
}

fn dictionary_context(words: &[DictionaryWord]) -> String {
    if words.is_empty() {
        return String::new();
    }
    let list: Vec<String> = words
        .iter()
        .take(5)
        .map(|w| format!("{} ({})", w.german, w.english))
        .collect();
    format!("\n\nMust include these words: {}", list.join(", "))
}

/// Build the generation prompt for one exercise.
///
/// Dictionary words, when present, override the requested kind: the
/// exercise is built around practicing those words.
pub fn build_exercise_prompt(
    kind: ExerciseKind,
    topics: &[TopicSelection],
    words: &[DictionaryWord],
    history: &PromptHistory,
) -> String {
    let topic = topic_context(topics);
    let dict = dictionary_context(words);
    let past = history_context(history);

    let kind = if words.is_empty() {
        kind
    } else {
        ExerciseKind::DictionaryPractice
    };

    match kind {
        ExerciseKind::Translation => format!(
            "Create a German-to-English translation exercise.\n\n\
             TOPIC: {topic}\n{dict}\n{past}\n\n\
             REQUIREMENTS:\n\
             - Level: A1-C2 (intermediate complexity preferred)\n\
             - Create ONE complete German sentence to translate\n\
             - Sentence should be natural and contextually rich\n\
             - Include cultural context or idiomatic expressions when relevant\n\
             - Avoid clichés like \"I go to the store\" or \"The weather is nice\"\n\n\
             OUTPUT FORMAT (exact structure):\n\
             Translate this German sentence to English:\n\
             [Your German sentence here]\n\n\
             IMPORTANT:\n\
             - Output ONLY the task in the format above\n\
             - Do NOT include English translation\n\
             - Do NOT add explanations, tips, or additional context\n\
             - Do NOT number the task"
        ),
        ExerciseKind::Conversation => {
            let scenario = CREATIVE_SCENARIOS[fastrand::usize(..CREATIVE_SCENARIOS.len())];
            format!(
                "Create a conversational German exercise.\n\n\
                 TOPIC: {topic}\nSCENARIO: {scenario}\n{dict}\n{past}\n\n\
                 REQUIREMENTS:\n\
                 - Level: A1-C2 (intermediate complexity preferred)\n\
                 - Create a realistic situation and a prompt requiring a German response\n\
                 - Use natural conversational language, not textbook phrases\n\
                 - Make the scenario engaging and memorable\n\n\
                 OUTPUT FORMAT (exact structure):\n\
                 Situation: [2-3 sentence scenario description]\n\
                 Respond in German to: [Specific prompt or question]\n\n\
                 IMPORTANT:\n\
                 - Output ONLY the task in the format above\n\
                 - Do NOT include the English translation of the expected answer\n\
                 - Do NOT include sample responses or hints\n\
                 - Do NOT add explanations beyond the situation description"
            )
        }
        ExerciseKind::Grammar => format!(
            "Create a German grammar exercise.\n\n\
             TOPIC: {topic}\n{dict}\n{past}\n\n\
             REQUIREMENTS:\n\
             - Level: A1-C2 (intermediate complexity preferred)\n\
             - Focus on ONE specific grammar concept\n\
             - Create 2-3 sentences testing this concept\n\
             - Use engaging, memorable examples with context\n\
             - Include clear instructions on what to do\n\n\
             OUTPUT FORMAT:\n\
             [Clear instruction about what grammar to practice]\n\
             [2-3 example sentences with blanks or items to correct]\n\n\
             IMPORTANT:\n\
             - Output ONLY the task with clear instructions\n\
             - Do NOT include the answers\n\
             - Do NOT add explanatory notes or grammar rules\n\
             - Make instructions specific (e.g., \"Fill in the correct article\" not \"Practice articles\")"
        ),
        ExerciseKind::Vocabulary => format!(
            "Create a German vocabulary exercise.\n\n\
             TOPIC: {topic}\n{dict}\n{past}\n\n\
             REQUIREMENTS:\n\
             - Present exactly 3-4 German words or phrases\n\
             - Include interesting, useful expressions (can include some lesser-known ones)\n\
             - For each word provide: German word, English meaning, and one example sentence\n\
             - Add brief cultural context if relevant\n\n\
             OUTPUT FORMAT:\n\
             Learn these German words:\n\n\
             1. [German word/phrase] - [English meaning]\n   \
                Example: [German sentence using the word]\n   \
                [Optional: Brief cultural note]\n\n\
             2. [Next word...]\n\n\
             IMPORTANT:\n\
             - Output ONLY the vocabulary list in the format above\n\
             - Keep cultural notes brief (one sentence max)\n\
             - Use natural, authentic German in examples"
        ),
        ExerciseKind::DictionaryPractice => format!(
            "Create an exercise using the user's dictionary words.\n\n\
             WORDS TO PRACTICE:\n{dict}\n{past}\n\n\
             REQUIREMENTS:\n\
             - Create ONE of these exercise types:\n  \
               a) A paragraph with blanks to fill using the dictionary words\n  \
               b) Sentences to translate that naturally include the words\n  \
               c) A short dialogue using the words\n\
             - Make the context natural and interesting\n\
             - Level: A1-C2 (match the complexity of the words)\n\n\
             OUTPUT FORMAT:\n\
             [Clear instruction]\n\
             [Exercise content]\n\n\
             IMPORTANT:\n\
             - Output ONLY the task\n\
             - Do NOT include answers\n\
             - Do NOT add vocabulary definitions (user already knows these words)\n\
             - Ensure all dictionary words are genuinely needed for the exercise"
        ),
        ExerciseKind::ListeningPractice => format!(
            "Create a German listening comprehension exercise.\n\n\
             TOPIC: {topic}\n{dict}\n{past}\n\n\
             REQUIREMENTS:\n\
             - Level: A1-C2 (intermediate complexity preferred)\n\
             - Create a short dialogue or monologue (3-5 sentences) in German\n\
             - Include authentic conversational elements (fillers, contractions, colloquialisms)\n\
             - Provide 2-3 comprehension questions in English\n\
             - Questions should test understanding of main ideas, details, or implied meaning\n\n\
             OUTPUT FORMAT (exact structure):\n\
             Listen to this German text:\n\
             [German dialogue or monologue here - 3-5 sentences]\n\n\
             Answer these questions:\n\
             1. [Question in English]\n\
             2. [Question in English]\n\
             3. [Question in English]\n\n\
             IMPORTANT:\n\
             - Output ONLY the task in the format above\n\
             - Do NOT include answers to the questions\n\
             - Do NOT provide translations of the German text\n\
             - Use natural, conversational German with realistic speech patterns\n\
             - Questions should encourage active listening and comprehension"
        ),
        ExerciseKind::CreativeWriting => {
            let starter =
                CREATIVE_WRITING_PROMPTS[fastrand::usize(..CREATIVE_WRITING_PROMPTS.len())];
            format!(
                "Create a German creative writing exercise.\n\n\
                 TOPIC: {topic}\nCREATIVE PROMPT: {starter}\n{dict}\n{past}\n\n\
                 REQUIREMENTS:\n\
                 - Level: A2-C2 (encourage creative expression)\n\
                 - Provide an engaging creative prompt or story starter\n\
                 - Ask for a 5-8 sentence response in German\n\
                 - Encourage use of specific grammar structures or vocabulary\n\
                 - Make it fun and imaginative\n\n\
                 OUTPUT FORMAT (exact structure):\n\
                 Creative Writing Challenge:\n\
                 [Engaging scenario or prompt - 2-3 sentences]\n\n\
                 Write 5-8 sentences in German about:\n\
                 [Specific writing task]\n\n\
                 Try to include: [2-3 grammar or vocabulary suggestions]\n\n\
                 IMPORTANT:\n\
                 - Output ONLY the task in the format above\n\
                 - Do NOT provide a sample response\n\
                 - Do NOT include translations\n\
                 - Make prompts imaginative and engaging\n\
                 - Encourage personal expression and creativity"
            )
        }
        ExerciseKind::ErrorCorrection => format!(
            "Create a German error detection and correction exercise.\n\n\
             TOPIC: {topic}\n{dict}\n{past}\n\n\
             REQUIREMENTS:\n\
             - Level: A2-C2 (intermediate to advanced)\n\
             - Create 3-4 German sentences with deliberate mistakes\n\
             - Include variety of error types: grammar (cases, verb conjugation, word order), \
               vocabulary misuse, article errors, preposition errors\n\
             - Errors should be realistic (common learner mistakes)\n\
             - Make sentences contextually connected (tell a mini-story)\n\n\
             OUTPUT FORMAT (exact structure):\n\
             Error Detective Challenge:\n\
             Find and correct the mistakes in these German sentences:\n\n\
             1. [German sentence with error]\n\
             2. [German sentence with error]\n\
             3. [German sentence with error]\n\
             4. [German sentence with error - optional]\n\n\
             Hint: Look for errors in [general hints like \"articles, verb conjugation, and word order\"]\n\n\
             IMPORTANT:\n\
             - Output ONLY the task in the format above\n\
             - Do NOT mark where the errors are\n\
             - Do NOT provide the corrected versions\n\
             - Do NOT explain the errors\n\
             - Errors should be realistic and educational\n\
             - Sentences should form a coherent context or mini-story"
        ),
    }
}

/// Build the grading prompt for a submitted answer.
pub fn build_feedback_prompt(kind: ExerciseKind, question: &str, answer: &str) -> String {
    match kind {
        ExerciseKind::Conversation => format!(
            "Evaluate this German conversation response.\n\n\
             SCENARIO: {question}\nSTUDENT'S RESPONSE: {answer}\n\n\
             REQUIREMENTS:\n\
             Provide feedback in English with this structure:\n\n\
             1. ASSESSMENT: [Excellent/Good/Needs Improvement]\n\n\
             2. EVALUATION:\n   \
                - Appropriateness: [Is the response culturally and contextually appropriate?]\n   \
                - Grammar: [Identify any errors and correct them]\n   \
                - Vocabulary: [Comment on word choice]\n   \
                - Naturalness: [Does it sound like natural German?]\n\n\
             3. NATIVE ALTERNATIVE: [Suggest how a native speaker might say this]\n\n\
             4. TIP: [One practical improvement for future responses]\n\n\
             Be constructive and supportive."
        ),
        ExerciseKind::Grammar => format!(
            "Evaluate this German grammar exercise.\n\n\
             EXERCISE: {question}\nSTUDENT'S ANSWER: {answer}\n\n\
             REQUIREMENTS:\n\
             Provide feedback in English with this structure:\n\n\
             1. ASSESSMENT: [Excellent/Good/Needs Improvement]\n\n\
             2. ANALYSIS:\n   \
                - Correct elements: [What they got right]\n   \
                - Errors: [What needs correction, if any]\n   \
                - Correct answer: [Provide if incorrect]\n\n\
             3. GRAMMAR EXPLANATION: [Explain the rule briefly and clearly]\n\n\
             4. MEMORY TRICK: [Provide a helpful mnemonic or pattern to remember]\n\n\
             Be clear and educational."
        ),
        ExerciseKind::Vocabulary => format!(
            "Evaluate this German vocabulary exercise.\n\n\
             EXERCISE: {question}\nSTUDENT'S ANSWERS: {answer}\n\n\
             REQUIREMENTS:\n\
             Provide feedback in English with this structure:\n\n\
             1. ASSESSMENT: [Score like \"3/4 correct\" or overall evaluation]\n\n\
             2. REVIEW:\n   \
                - Correct answers: [List them with praise]\n   \
                - Incorrect answers: [Show correct form with explanation]\n\n\
             3. ADDITIONAL INFO: [Related words, usage notes, or cultural context]\n\n\
             4. TIP: [Memory technique or learning suggestion]\n\n\
             Be encouraging and informative."
        ),
        ExerciseKind::ListeningPractice => format!(
            "Evaluate answers to this German listening comprehension exercise.\n\n\
             EXERCISE: {question}\nSTUDENT'S ANSWERS: {answer}\n\n\
             REQUIREMENTS:\n\
             Provide feedback in English with this structure:\n\n\
             1. ASSESSMENT: [Score like \"2/3 correct\" or overall evaluation]\n\n\
             2. ANSWER REVIEW:\n   \
                - Question 1: [Correct/Incorrect - brief explanation]\n   \
                - Question 2: [Correct/Incorrect - brief explanation]\n   \
                - Question 3: [Correct/Incorrect - brief explanation]\n\n\
             3. COMPREHENSION ANALYSIS:\n   \
                - What the student understood well\n   \
                - What was missed or misunderstood\n   \
                - Key vocabulary or phrases that were important\n\n\
             4. LISTENING TIP: [Specific advice for improving German listening skills]\n\n\
             Be encouraging and focus on comprehension strategies."
        ),
        ExerciseKind::CreativeWriting => format!(
            "Evaluate this German creative writing exercise.\n\n\
             EXERCISE: {question}\nSTUDENT'S WRITING: {answer}\n\n\
             REQUIREMENTS:\n\
             Provide feedback in English with this structure:\n\n\
             1. ASSESSMENT: [Excellent/Good/Needs Improvement]\n\n\
             2. CONTENT & CREATIVITY:\n   \
                - How well the prompt was addressed\n   \
                - Creativity and originality of ideas\n   \
                - Engagement and interest level\n\n\
             3. LANGUAGE QUALITY:\n   \
                - Grammar accuracy: [Note any errors]\n   \
                - Vocabulary usage: [Richness, appropriateness]\n   \
                - Sentence structure: [Variety, complexity]\n   \
                - Natural flow: [Does it sound natural?]\n\n\
             4. CORRECTIONS: [List any grammar/vocabulary errors with corrections]\n\n\
             5. SUGGESTIONS: [2-3 specific ways to enhance the writing]\n\n\
             6. ENCOURAGEMENT: [Positive note about what worked well]\n\n\
             Be supportive and constructive. Focus on both content and language."
        ),
        ExerciseKind::ErrorCorrection => format!(
            "Evaluate this German error correction exercise.\n\n\
             ORIGINAL EXERCISE: {question}\nSTUDENT'S CORRECTIONS: {answer}\n\n\
             REQUIREMENTS:\n\
             Provide feedback in English with this structure:\n\n\
             1. ASSESSMENT: [Score like \"3/4 errors found and corrected\"]\n\n\
             2. ERROR-BY-ERROR REVIEW:\n   \
                Sentence 1: [Whether they found/corrected the error + correct version]\n   \
                Sentence 2: [Whether they found/corrected the error + correct version]\n   \
                Sentence 3: [Whether they found/corrected the error + correct version]\n   \
                Sentence 4: [Whether they found/corrected the error + correct version - if applicable]\n\n\
             3. EXPLANATIONS:\n   \
                - Explain each error type (why it was wrong)\n   \
                - Provide the grammar rule or principle\n   \
                - Mention if they missed any errors\n\n\
             4. LEARNING POINT: [Key takeaway about common German mistakes]\n\n\
             Be clear and educational. Help them understand WHY errors occur."
        ),
        // Translation and dictionary practice share the translation rubric.
        _ => format!(
            "Evaluate this German translation exercise.\n\n\
             EXERCISE: {question}\nSTUDENT'S ANSWER: {answer}\n\n\
             REQUIREMENTS:\n\
             Provide feedback in English with this structure:\n\n\
             1. ASSESSMENT: [Excellent/Good/Needs Improvement]\n\n\
             2. EVALUATION:\n   \
                - What is correct: [Be specific]\n   \
                - What needs correction: [If any errors exist]\n   \
                - Correct answer: [Only if student's answer was incorrect]\n\n\
             3. EXPLANATION: [Why the correct answer works, brief grammar/vocabulary notes]\n\n\
             4. TIP: [One helpful mnemonic or learning tip]\n\n\
             Be encouraging but honest. Focus on learning, not just praise."
        ),
    }
}

/// Build the word-analysis prompt. The response is parsed line by line;
/// see [`crate::exercises::analyze`] for the expected fields.
pub fn build_word_analysis_prompt(word: &str, context: &str) -> String {
    format!(
        "Analyze ONLY the following German word or phrase - do NOT analyze or include any \
         other word from the context, unless it is part of the selected word itself.\n\n\
         Your highest rule:\n\
         If the word is a verb in any conjugated, participle, or modal form, you MUST \
         replace it with its infinitive form in the [German:] line. Do not ever keep the \
         conjugated form (e.g., 'konnte', 'hatte', 'ging', 'schwimmt'). The [German:] field \
         must always contain the infinitive form (e.g., 'können', 'haben', 'gehen', 'schwimmen').\n\n\
         If the word is a noun - use singular with article and plural in parentheses \
         (e.g., der Tisch (die Tische)).\n\
         If the word is an adjective - use base form (e.g., schön).\n\
         If the word is an adverb - use base form (e.g., gern).\n\
         If it's a participle used adjectivally - use adjective base (e.g., gefragt).\n\
         Never automatically create a noun from a verb or adjective.\n\
         Analyze only the provided word, ignore others in the sentence.\n\n\
         Word/Phrase: \"{word}\"\n\
         Context (for reference only): {context}\n\n\
         Provide the information in this EXACT format (each field on a new line):\n\n\
         German: [normalized form per the rules above]\n\
         English: [English translation - accurate and specific]\n\
         Russian: [Russian translation in Cyrillic - natural and precise]\n\
         Type: [verb / noun / adjective / adverb / phrase / other]\n\
         Category: [conversation / grammar / vocabulary]\n\
         Explanation: [2-3 sentences: primary meaning and usage, grammar details (gender, \
         separability, case), common mistakes or nuances]\n\
         Example1: [Complete sentence in German] - [English translation]\n\
         Example2: [Complete sentence in German] - [English translation]\n\
         Example3: [Complete sentence in German] - [English translation]\n\n\
         GENERAL RULES:\n\
         - Always return verbs in infinitive form.\n\
         - Always return nouns in singular with plural in parentheses, with article.\n\
         - Never reproduce the conjugated or declined form from the sentence.\n\
         - If the verb is reflexive, include \"sich\" and the governed case \
           (e.g., sich erinnern an + Akkusativ).\n\
         - If the verb takes a preposition, show infinitive + preposition + case \
           (e.g., warten auf + Akkusativ).\n\
         - If the verb is separable, show the present separation \
           (e.g., ankommen (kommt an)).\n\
         - Context is for meaning only, not for morphology.\n\
         - For ambiguous inputs, assume the most common part of speech and note it \
           in the explanation.\n\
         - Be concise, grammatical, and consistent."
    )
}
