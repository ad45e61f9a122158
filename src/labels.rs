// ABOUTME: Maps raw column identifiers to the labels shown in table headers and forms.
// ABOUTME: Unmapped columns are shown verbatim.

pub fn display_label(column: &str) -> &str {
    match column {
        "id" => "ID",
        "name" => "Название",
        "number" => "Номер",
        "model" => "Модель",
        "property" => "Собственность",
        "country" => "Страна",
        "foundation" => "Дата основания",
        "surname" => "Фамилия",
        "experience" => "Стаж",
        "contract_start" => "Начало контракта",
        "contract_end" => "Окончание контракта",
        "plane" => "Самолёт",
        "pilot" => "Пилот",
        "departure" => "Отправление",
        "destination" => "Прибытие",
        "airline" => "Авиакомпания",
        "duration" => "Длительность",
        other => other,
    }
}

pub fn display_labels<S: AsRef<str>>(columns: &[S]) -> Vec<String> {
    columns
        .iter()
        .map(|c| display_label(c.as_ref()).to_string())
        .collect()
}
