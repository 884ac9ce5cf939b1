use crate::components::Person;

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
}

pub fn relationship_prompt(a: &Person, b: &Person, ancestors: &[&Person]) -> String {
    format!(
        r#"Context: A Chinese Genealogy system (中华族谱).
Task: Analyze the relationship between {a_name} ({a_gen}世) and {b_name} ({b_gen}世).

Data:
Person A: {a_json}
Person B: {b_json}
Relevant Ancestors: {ancestors}

Requirements:
1. Determine the exact relationship title (e.g., 堂兄, 族叔, 从孙).
2. Determine the generation distance (e.g., "三代内", "五代内").
3. Determine "Wu Fu" (Five Degrees of Mourning) status (e.g., "五服以内", "五服之外").
4. Provide a very brief logic explanation.

Output Format: JSON with keys: "title" (string), "generation_distance" (string), "wufu" (string), "explanation" (string).
Example Output: {{ "title": "堂兄", "generation_distance": "三代内", "wufu": "五服以内", "explanation": "同祖父，不同父亲，且A比B年长。" }}"#,
        a_name = a.full_name(),
        a_gen = a.generation,
        b_name = b.full_name(),
        b_gen = b.generation,
        a_json = to_json(a),
        b_json = to_json(b),
        ancestors = to_json(ancestors),
    )
}

pub fn biography_prompt(person: &Person) -> String {
    format!(
        r#"Task: Write a short, dignified, historical-style biography (in Chinese) for a family tree member.
Style: Classical yet readable, respectful (Traditional Chinese Tone).
Person: {}

If data is sparse, generate a plausible, respectful description based on their generation context and location.
Max 100 words."#,
        to_json(person)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Gender, PersonId};

    #[test]
    fn test_relationship_prompt_names_both() {
        let a = Person::new(PersonId(1), "李", "崇文", Gender::Male, 1);
        let b = Person::new(PersonId(2), "李", "正道", Gender::Male, 2);
        let prompt = relationship_prompt(&a, &b, &[&a]);
        assert!(prompt.contains("李崇文 (1世)"));
        assert!(prompt.contains("李正道 (2世)"));
        assert!(prompt.contains("\"title\": \"堂兄\""));
    }
}
